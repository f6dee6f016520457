//! Read-only views: digital inputs, analog sensors, and RF code slots.

use espanel_core::{InputState, SensorReading, SlotState, entity_map, snapshot::on_off};
use tabled::Tabled;
use tracing::debug;

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct InputRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Reading")]
    reading: String,
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Contents")]
    contents: String,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_inputs(settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;

    let mut inputs = Vec::with_capacity(entity_map::BINARY_SENSORS.len());
    for id in entity_map::BINARY_SENSORS {
        let state = match panel.client().binary_sensor_state(id).await {
            Ok(s) => s.state.or_else(|| s.value.map(|v| on_off(v).to_owned())),
            Err(e) => {
                debug!(id, error = %e, "input fetch failed");
                None
            }
        };
        inputs.push(InputState { id, state });
    }

    let color = output::should_color(&settings.color);
    let out = output::render_list(
        &settings.output,
        &inputs,
        |i| InputRow {
            input: i.id.into(),
            state: output::paint_state(i.display(), color),
        },
        |i| format!("{} {}", i.id, i.display()),
    );
    output::print_output(&out, settings.quiet);
    Ok(())
}

pub async fn handle_sensors(settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;

    let mut sensors = Vec::with_capacity(entity_map::SENSORS.len());
    for spec in entity_map::SENSORS {
        let raw = match panel.client().sensor_state(spec.id).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(id = spec.id, error = %e, "sensor fetch failed");
                None
            }
        };
        sensors.push(SensorReading {
            id: spec.id,
            label: spec.label,
            unit: spec.unit,
            precision: spec.precision,
            raw,
        });
    }

    let out = output::render_list(
        &settings.output,
        &sensors,
        |s| SensorRow {
            sensor: s.label.into(),
            reading: s.display(),
        },
        |s| format!("{} {}", s.id, s.display()),
    );
    output::print_output(&out, settings.quiet);
    Ok(())
}

pub async fn handle_slots(settings: &Settings) -> Result<(), CliError> {
    let panel = util::oneshot_panel(settings)?;
    let (learned_status, slots) = panel.refresh_slots().await;
    print_slots(learned_status.as_deref(), &slots, settings);
    Ok(())
}

/// Shared slot rendering, also used after slot-mutating RF actions.
pub fn print_slots(learned_status: Option<&str>, slots: &[SlotState], settings: &Settings) {
    if matches!(settings.output, crate::cli::OutputFormat::Table) && !settings.quiet {
        println!(
            "Learned: {}",
            learned_status.unwrap_or(espanel_core::PLACEHOLDER)
        );
    }

    let out = output::render_list(
        &settings.output,
        slots,
        |s| SlotRow {
            slot: format!("{:02}", s.index),
            contents: s.display().to_owned(),
        },
        |s| format!("{} {}", s.id, s.display()),
    );
    output::print_output(&out, settings.quiet);
}
