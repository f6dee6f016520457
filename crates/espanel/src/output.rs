//! Rendering for the `--output` formats.
//!
//! Tables come from `tabled` row structs, JSON and YAML straight off the
//! serde derives, and plain is one value per line for shell pipelines.
//! Color is decided once per invocation and threaded through as a bool.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Colorize an ON/OFF/placeholder state label for table output.
pub fn paint_state(label: &str, color: bool) -> String {
    if !color {
        return label.to_owned();
    }
    match label {
        "ON" => label.green().bold().to_string(),
        "OFF" => label.dimmed().to_string(),
        _ => label.yellow().to_string(),
    }
}

/// Colorize the reachability banner.
pub fn paint_reachable(reachable: bool, color: bool) -> String {
    let label = if reachable {
        "reachable"
    } else {
        "UNREACHABLE"
    };
    if !color {
        return label.to_owned();
    }
    if reachable {
        label.green().to_string()
    } else {
        label.red().bold().to_string()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of entities in the chosen format.
///
/// `to_row` feeds the table renderer; `line_fn` produces the plain
/// one-line-per-entity form. The structured formats serialize the
/// original data, never the display strings.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&line_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one item in the chosen format.
///
/// Single-item views have no `Tabled` rows; `detail_fn` supplies the
/// pre-formatted text used in table mode.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    line_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => line_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    result.unwrap_or_else(|e| format!("serialization failed: {e}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("serialization failed: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        state: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "State")]
        state: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: "relay1",
                state: "ON",
            },
            Item {
                id: "relay2",
                state: "OFF",
            },
        ]
    }

    #[test]
    fn plain_emits_one_line_per_item() {
        let out = render_list(
            &OutputFormat::Plain,
            &items(),
            |i| ItemRow {
                id: i.id.into(),
                state: i.state.into(),
            },
            |i| format!("{} {}", i.id, i.state),
        );
        assert_eq!(out, "relay1 ON\nrelay2 OFF");
    }

    #[test]
    fn json_compact_is_single_line() {
        let out = render_list(
            &OutputFormat::JsonCompact,
            &items(),
            |i| ItemRow {
                id: i.id.into(),
                state: i.state.into(),
            },
            |i| i.id.to_owned(),
        );
        assert!(!out.contains('\n'));
        assert!(out.contains(r#""id":"relay1""#));
    }

    #[test]
    fn paint_state_passthrough_without_color() {
        assert_eq!(paint_state("ON", false), "ON");
        assert_eq!(paint_state("—", false), "—");
    }
}
