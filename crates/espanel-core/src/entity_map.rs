// ── Static panel description ──
//
// The KC868-A8 YAML defines a fixed set of entities; their object ids are
// listed here once, as data, so the refresh passes and the CLI iterate a
// single table instead of hard-coding identifiers at every call site.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── Entity classes ──────────────────────────────────────────────────

/// Relay switches, in panel order.
pub const SWITCHES: [&str; 8] = [
    "relay1", "relay2", "relay3", "relay4", "relay5", "relay6", "relay7", "relay8",
];

/// Digital input binary sensors, in panel order.
pub const BINARY_SENSORS: [&str; 8] = [
    "input1", "input2", "input3", "input4", "input5", "input6", "input7", "input8",
];

/// Analog sensor with display metadata.
#[derive(Debug, Clone, Copy)]
pub struct SensorSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub precision: usize,
}

/// Analog voltage inputs.
pub const SENSORS: [SensorSpec; 2] = [
    SensorSpec {
        id: "a1_volts",
        label: "A1",
        unit: "V",
        precision: 3,
    },
    SensorSpec {
        id: "a2_volts",
        label: "A2",
        unit: "V",
        precision: 3,
    },
];

/// Template numbers (RF tuning parameters and the slot selector).
pub const NUMBERS: [&str; 6] = [
    "rf_repeat",
    "rf_pulse_len",
    "slot_select",
    "rf_min_bits",
    "rf_min_raw_timings",
    "rf_quiet_ms",
];

/// Select entities.
pub const SELECTS: [&str; 1] = ["rf_protocol_select"];

/// Free-form status line published by the RF learner.
pub const LEARNED_STATUS: &str = "learned_status";

/// Number of persistent RF code slots on the device.
pub const SLOT_COUNT: u8 = 16;

/// Remote identifier for a slot text sensor: 1-based index, zero-padded
/// (`3` → `slot_03`, `16` → `slot_16`).
pub fn slot_id(index: u8) -> Result<String, CoreError> {
    if index == 0 || index > SLOT_COUNT {
        return Err(CoreError::SlotOutOfRange { index });
    }
    Ok(format!("slot_{index:02}"))
}

/// All 16 slot identifiers, in slot order.
pub fn slot_ids() -> Vec<String> {
    (1..=SLOT_COUNT).map(|i| format!("slot_{i:02}")).collect()
}

// ── Template buttons ────────────────────────────────────────────────

/// The six RF-learning workflow actions, each backed by a template button
/// on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    StartLearning,
    TxLearned,
    SaveSlot,
    TxSlot,
    ClearSlot,
    LearnToSlot,
}

impl ButtonAction {
    pub const ALL: [Self; 6] = [
        Self::StartLearning,
        Self::TxLearned,
        Self::SaveSlot,
        Self::TxSlot,
        Self::ClearSlot,
        Self::LearnToSlot,
    ];

    /// Candidate remote identifiers, primary spelling first.
    ///
    /// The firmware derives object ids from human-readable button names,
    /// and the sanitization rules changed between builds (the save button's
    /// name contains an arrow character that is stripped by some versions
    /// and replaced by others), so every plausible spelling is listed.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::StartLearning => &["start_rf_learning_ui"],
            Self::TxLearned => &["transmit_learned_433"],
            Self::SaveSlot => &[
                "save_learned_slot",
                "save_learned_→_slot",
                "save_learned___slot",
            ],
            Self::TxSlot => &["transmit_slot"],
            Self::ClearSlot => &["clear_slot"],
            Self::LearnToSlot => &["learn_to_selected_slot"],
        }
    }

    /// Whether a successful press changes the stored slot contents (the
    /// caller should re-fetch the slot texts afterwards).
    pub fn mutates_slots(self) -> bool {
        matches!(self, Self::SaveSlot | Self::ClearSlot)
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartLearning => "start-learning",
            Self::TxLearned => "tx-learned",
            Self::SaveSlot => "save-slot",
            Self::TxSlot => "tx-slot",
            Self::ClearSlot => "clear-slot",
            Self::LearnToSlot => "learn-to-slot",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ButtonAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start-learning" => Ok(Self::StartLearning),
            "tx-learned" => Ok(Self::TxLearned),
            "save-slot" => Ok(Self::SaveSlot),
            "tx-slot" => Ok(Self::TxSlot),
            "clear-slot" => Ok(Self::ClearSlot),
            "learn-to-slot" => Ok(Self::LearnToSlot),
            other => Err(CoreError::UnknownEntity {
                class: "button",
                name: other.to_owned(),
            }),
        }
    }
}
