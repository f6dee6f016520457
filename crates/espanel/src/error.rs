//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use espanel_api::Error as ApiError;
use espanel_core::CoreError;
use espanel_core::snapshot::on_off;

/// Exit codes reported to the shell.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the device")]
    #[diagnostic(
        code(espanel::connection_failed),
        help(
            "Check that the board is powered and on the network.\n\
             Try: espanel status -d <ip>"
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to the device timed out")]
    #[diagnostic(
        code(espanel::timeout),
        help("Increase the timeout with --timeout or check the device's responsiveness.")
    )]
    Timeout,

    // ── Configuration ────────────────────────────────────────────────

    #[error("No device address configured")]
    #[diagnostic(
        code(espanel::no_device),
        help(
            "Pass --device <ip>, set ESPANEL_DEVICE, or save one with:\n\
             espanel config init <ip>\n\
             Config path: {path}"
        )
    )]
    NoDevice { path: String },

    #[error(transparent)]
    #[diagnostic(code(espanel::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(espanel::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(espanel::not_found),
        help("Run: espanel {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No matching button on the device (tried: {})", tried.join(", "))]
    #[diagnostic(
        code(espanel::button_not_found),
        help(
            "The device firmware exposes none of the known identifiers for this action.\n\
             It may be running an older template -- check the ESPHome config."
        )
    )]
    ButtonNotFound { tried: Vec<String> },

    // ── Device rejections ────────────────────────────────────────────

    #[error("Relay '{id}' write failed; device still reports {}", on_off(*.reverted_to))]
    #[diagnostic(
        code(espanel::toggle_failed),
        help("The relay keeps its previous state. Re-check with: espanel relay list")
    )]
    ToggleFailed {
        id: String,
        reverted_to: bool,
        #[source]
        source: ApiError,
    },

    #[error("Device rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(espanel::device_error))]
    DeviceError { status: u16, message: String },

    #[error("Unexpected response from the device: {message}")]
    #[diagnostic(
        code(espanel::protocol),
        help("Is the address really a KC868-A8 running the ESPHome web server?")
    )]
    Protocol { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(espanel::validation))]
    Validation { field: String, reason: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ButtonNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoDevice { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ApiError / CoreError → CliError mapping ──────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(e) if e.is_timeout() => CliError::Timeout,
            ApiError::Transport(e) => CliError::ConnectionFailed { source: e.into() },
            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "device".into(),
                reason: e.to_string(),
            },
            ApiError::Http { status: 404, body } => CliError::NotFound {
                resource_type: "entity".into(),
                identifier: body,
                list_command: "status".into(),
            },
            ApiError::Http { status, body } => CliError::DeviceError {
                status,
                message: body,
            },
            ApiError::Deserialization { message, .. } => CliError::Protocol { message },
            ApiError::ButtonNotFound { tried } => CliError::ButtonNotFound { tried },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => api.into(),

            CoreError::UnknownEntity { class, name } => CliError::NotFound {
                resource_type: class.into(),
                identifier: name,
                list_command: match class {
                    "switch" => "relay list".into(),
                    "number" => "params get".into(),
                    "select" => "protocol get".into(),
                    _ => "status".into(),
                },
            },

            CoreError::SlotOutOfRange { index } => CliError::Validation {
                field: "slot".into(),
                reason: format!("slot {index} is out of range (1-16)"),
            },

            CoreError::ToggleFailed {
                id,
                reverted_to,
                source,
            } => CliError::ToggleFailed {
                id,
                reverted_to,
                source,
            },
        }
    }
}
