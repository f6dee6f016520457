//! Status and watch handlers: the full-panel views.

use std::fmt::Write as _;
use std::io::{self, IsTerminal};
use std::time::Duration;

use espanel_core::{Panel, PanelConfig, PanelSnapshot};
use tabled::Tabled;

use crate::cli::{OutputFormat, WatchArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "State")]
    state: String,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_status(settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;
    let snapshot = panel.refresh_all().await;

    let out = render_snapshot(&snapshot, settings);
    output::print_output(&out, settings.quiet);

    if snapshot.reachable {
        Ok(())
    } else {
        Err(CliError::ConnectionFailed {
            source: "no entity class answered the refresh".into(),
        })
    }
}

pub async fn handle_watch(args: WatchArgs, settings: &Settings) -> Result<(), CliError> {
    let address = settings.require_device()?;
    let config = PanelConfig::new(address)
        .with_timeout(settings.timeout)
        .with_refresh_interval(Duration::from_secs(args.interval.max(1)));
    let panel = Panel::new(config)?;

    let mut rx = panel.subscribe_snapshot();
    panel.connect().await;

    loop {
        if let Some(snapshot) = rx.borrow_and_update().clone() {
            draw_frame(&snapshot, settings);
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    panel.shutdown().await;
    Ok(())
}

fn draw_frame(snapshot: &PanelSnapshot, settings: &Settings) {
    // Redraw in place when we own an interactive terminal; otherwise
    // emit frames sequentially (pipelines, logs).
    if matches!(settings.output, OutputFormat::Table) && io::stdout().is_terminal() {
        print!("\x1b[2J\x1b[H");
    }
    let out = render_snapshot(snapshot, settings);
    output::print_output(&out, settings.quiet);
}

// ── Rendering ───────────────────────────────────────────────────────

pub fn render_snapshot(snapshot: &PanelSnapshot, settings: &Settings) -> String {
    match settings.output {
        OutputFormat::Table => render_table(snapshot, settings),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_single(&settings.output, snapshot, |_| String::new(), |_| String::new())
        }
        OutputFormat::Plain => render_plain(snapshot),
    }
}

fn render_table(snapshot: &PanelSnapshot, settings: &Settings) -> String {
    let color = output::should_color(&settings.color);
    let device = settings.device.as_deref().unwrap_or("?");
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Device {device} — {} — fetched {}",
        output::paint_reachable(snapshot.reachable, color),
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    let _ = writeln!(out, "\nRelays:");
    let _ = writeln!(
        out,
        "{}",
        section(snapshot.relays.iter().map(|r| EntityRow {
            entity: r.id.into(),
            state: output::paint_state(r.display(), color),
        }))
    );

    let _ = writeln!(out, "\nInputs:");
    let _ = writeln!(
        out,
        "{}",
        section(snapshot.inputs.iter().map(|i| EntityRow {
            entity: i.id.into(),
            state: output::paint_state(i.display(), color),
        }))
    );

    let _ = writeln!(out, "\nAnalog:");
    let _ = writeln!(
        out,
        "{}",
        section(snapshot.sensors.iter().map(|s| EntityRow {
            entity: s.label.into(),
            state: s.display(),
        }))
    );

    let _ = writeln!(out, "\nRF parameters:");
    let params = snapshot
        .numbers
        .iter()
        .chain(snapshot.selects.iter())
        .map(|p| EntityRow {
            entity: p.id.into(),
            state: p.display().to_owned(),
        });
    let _ = writeln!(out, "{}", section(params));

    let _ = writeln!(
        out,
        "\nLearned: {}",
        snapshot
            .learned_status
            .as_deref()
            .unwrap_or(espanel_core::PLACEHOLDER)
    );

    let _ = writeln!(out, "\nSlots:");
    let _ = write!(
        out,
        "{}",
        section(snapshot.slots.iter().map(|s| EntityRow {
            entity: format!("slot {:02}", s.index),
            state: s.display().to_owned(),
        }))
    );

    out
}

fn section(rows: impl Iterator<Item = EntityRow>) -> String {
    use tabled::settings::Style;
    tabled::Table::new(rows.collect::<Vec<_>>())
        .with(Style::rounded())
        .to_string()
}

fn render_plain(snapshot: &PanelSnapshot) -> String {
    let mut lines = Vec::new();
    lines.push(format!("reachable {}", snapshot.reachable));
    for r in &snapshot.relays {
        lines.push(format!("{} {}", r.id, r.display()));
    }
    for i in &snapshot.inputs {
        lines.push(format!("{} {}", i.id, i.display()));
    }
    for s in &snapshot.sensors {
        lines.push(format!("{} {}", s.id, s.display()));
    }
    for p in snapshot.numbers.iter().chain(snapshot.selects.iter()) {
        lines.push(format!("{} {}", p.id, p.display()));
    }
    lines.push(format!(
        "learned_status {}",
        snapshot
            .learned_status
            .as_deref()
            .unwrap_or(espanel_core::PLACEHOLDER)
    ));
    for s in &snapshot.slots {
        lines.push(format!("{} {}", s.id, s.display()));
    }
    lines.join("\n")
}
