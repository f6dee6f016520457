// ── Panel snapshot types ──
//
// One refresh pass produces one PanelSnapshot. Per-entity values are
// Option<T>: None means the fetch failed and the display falls back to a
// placeholder, distinguishable from fresh data.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder rendered for entities whose fetch failed.
pub const PLACEHOLDER: &str = "—";

/// Render a boolean-like state as the panel's ON/OFF labels.
pub fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Format a raw numeric-string sensor state to fixed precision with its
/// unit (`"3.14159"`, `"V"`, 3 → `"3.142 V"`). Unparseable or missing
/// values render as the placeholder.
pub fn format_sensor(raw: Option<&str>, unit: &str, precision: usize) -> String {
    match raw.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(v) => format!("{v:.precision$} {unit}"),
        None => PLACEHOLDER.to_owned(),
    }
}

// ── Per-entity states ───────────────────────────────────────────────

/// One relay switch.
#[derive(Debug, Clone, Serialize)]
pub struct RelayState {
    pub id: &'static str,
    /// `None` when the fetch failed.
    pub on: Option<bool>,
}

impl RelayState {
    pub fn display(&self) -> &'static str {
        self.on.map_or(PLACEHOLDER, on_off)
    }
}

/// One digital input.
#[derive(Debug, Clone, Serialize)]
pub struct InputState {
    pub id: &'static str,
    /// Preformatted state label; `None` when the fetch failed.
    pub state: Option<String>,
}

impl InputState {
    pub fn display(&self) -> &str {
        self.state.as_deref().unwrap_or(PLACEHOLDER)
    }
}

/// One analog sensor reading.
#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    pub id: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub precision: usize,
    /// Raw numeric string as reported; `None` when the fetch failed.
    pub raw: Option<String>,
}

impl SensorReading {
    /// Fixed-precision rendering, e.g. `3.142 V`.
    pub fn display(&self) -> String {
        format_sensor(self.raw.as_deref(), self.unit, self.precision)
    }
}

/// One RF code slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotState {
    /// 1-based slot index.
    pub index: u8,
    /// Remote identifier (`slot_01`..`slot_16`).
    pub id: String,
    /// Stored code description; `None` when empty or unavailable.
    pub value: Option<String>,
}

impl SlotState {
    pub fn display(&self) -> &str {
        self.value.as_deref().unwrap_or("Empty / unavailable")
    }
}

/// One number or select parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamState {
    pub id: &'static str,
    /// Current value as reported; `None` when the fetch failed.
    pub value: Option<String>,
}

impl ParamState {
    pub fn display(&self) -> &str {
        self.value.as_deref().unwrap_or(PLACEHOLDER)
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// The complete panel state captured by one refresh pass.
///
/// Rebuilt wholesale every pass — there is no merging with previous
/// snapshots; last successful fetch wins.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    pub relays: Vec<RelayState>,
    pub inputs: Vec<InputState>,
    pub sensors: Vec<SensorReading>,
    pub learned_status: Option<String>,
    /// Always 16 entries, rebuilt on every text refresh pass.
    pub slots: Vec<SlotState>,
    pub numbers: Vec<ParamState>,
    pub selects: Vec<ParamState>,
    /// Whether every entity class completed its pass without a
    /// transport-level failure.
    pub reachable: bool,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_formats_to_fixed_precision() {
        assert_eq!(format_sensor(Some("3.14159"), "V", 3), "3.142 V");
    }

    #[test]
    fn sensor_placeholder_for_missing_or_garbage() {
        assert_eq!(format_sensor(None, "V", 3), PLACEHOLDER);
        assert_eq!(format_sensor(Some("not a number"), "V", 3), PLACEHOLDER);
    }

    #[test]
    fn on_off_labels() {
        assert_eq!(on_off(true), "ON");
        assert_eq!(on_off(false), "OFF");
    }

    #[test]
    fn relay_display_falls_back_to_placeholder() {
        let relay = RelayState {
            id: "relay1",
            on: None,
        };
        assert_eq!(relay.display(), PLACEHOLDER);
    }

    #[test]
    fn slot_display_marks_unavailable() {
        let slot = SlotState {
            index: 4,
            id: "slot_04".into(),
            value: None,
        };
        assert_eq!(slot.display(), "Empty / unavailable");
    }
}
