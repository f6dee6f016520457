//! CLI configuration: the saved device address and output defaults.
//!
//! TOML file under the platform config dir, merged with `ESPANEL_*`
//! environment variables. CLI flags override both.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Saved device address (IP or host), used when --device is absent.
    pub device: Option<String>,

    /// Output defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "espanel", "espanel").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("espanel");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("ESPANEL_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Effective settings ──────────────────────────────────────────────

/// Flags, environment, and config file merged into one place.
///
/// Resolution order for each field is flag > env > config file > built-in
/// default (clap handles the flag/env steps).
#[derive(Debug, Clone)]
pub struct Settings {
    pub device: Option<String>,
    pub output: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
    pub timeout: Duration,
}

impl Settings {
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Self {
        let device = global.device.clone().or_else(|| cfg.device.clone());

        let output = global
            .output
            .clone()
            .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);

        let color = global
            .color
            .clone()
            .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);

        let timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));

        Self {
            device,
            output,
            color,
            quiet: global.quiet,
            timeout,
        }
    }

    /// The device address, or the error telling the user how to set one.
    pub fn require_device(&self) -> Result<&str, CliError> {
        self.device.as_deref().ok_or_else(|| CliError::NoDevice {
            path: config_path().display().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bare_global() -> GlobalOpts {
        GlobalOpts {
            device: None,
            output: None,
            color: None,
            verbose: 0,
            quiet: false,
            timeout: None,
        }
    }

    #[test]
    fn flag_overrides_saved_device() {
        let cfg = Config {
            device: Some("192.168.1.77".into()),
            defaults: Defaults::default(),
        };
        let mut global = bare_global();
        global.device = Some("10.0.0.5".into());

        let settings = Settings::resolve(&global, &cfg);
        assert_eq!(settings.device.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn config_defaults_fill_missing_flags() {
        let cfg = Config {
            device: Some("192.168.1.77".into()),
            defaults: Defaults {
                output: "json".into(),
                color: "never".into(),
                timeout: 3,
            },
        };

        let settings = Settings::resolve(&bare_global(), &cfg);
        assert_eq!(settings.device.as_deref(), Some("192.168.1.77"));
        assert_eq!(settings.output, OutputFormat::Json);
        assert_eq!(settings.color, ColorMode::Never);
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_device_is_a_usage_error() {
        let settings = Settings::resolve(&bare_global(), &Config::default());
        match settings.require_device() {
            Err(CliError::NoDevice { .. }) => {}
            other => panic!("expected NoDevice, got: {other:?}"),
        }
    }

    #[test]
    fn garbage_config_default_falls_back_to_table() {
        let cfg = Config {
            device: None,
            defaults: Defaults {
                output: "fancy".into(),
                ..Defaults::default()
            },
        };
        let settings = Settings::resolve(&bare_global(), &cfg);
        assert_eq!(settings.output, OutputFormat::Table);
    }
}
