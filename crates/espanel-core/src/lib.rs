//! Panel semantics for a KC868-A8 relay / RF-learning controller running
//! ESPHome, layered over the `espanel-api` wire client.
//!
//! - **[`entity_map`]** — the static description of the panel: which
//!   switches, inputs, sensors, parameters, slot text sensors, and template
//!   buttons exist on the device, and every candidate remote identifier for
//!   each button (firmware builds sanitize names differently).
//!
//! - **[`Panel`]** — facade owning the device client and panel lifecycle:
//!   [`connect()`](Panel::connect) performs the initial refresh and spawns
//!   the periodic poll task; mutation methods carry the panel's write
//!   policies (optimistic relay toggles with revert-on-failure,
//!   write-through numbers/selects, button presses with identifier
//!   fallback).
//!
//! - **[`PanelSnapshot`]** — the transient result of one refresh pass.
//!   Every entity refreshes independently; a failed fetch yields a
//!   placeholder, never an aborted pass.

pub mod entity_map;
pub mod error;
pub mod panel;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use entity_map::ButtonAction;
pub use error::CoreError;
pub use panel::{Panel, PanelConfig};
pub use snapshot::{
    InputState, PLACEHOLDER, PanelSnapshot, ParamState, RelayState, SensorReading, SlotState,
};
