// Wire-format mirrors of the ESPHome web_server JSON payloads.
//
// The firmware includes extra fields (e.g. an `id` echo) on most
// responses; only the fields the panel consumes are modeled here, and
// unknown fields are ignored by serde's defaults.

use serde::Deserialize;

/// Response body for `GET /switch/<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchState {
    pub value: bool,
}

/// Response body for `GET /binary_sensor/<id>`.
///
/// Older firmware builds report a preformatted `state` string, newer ones
/// a raw boolean `value`; either (or both) may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BinarySensorState {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub value: Option<bool>,
}

/// Shared response body for sensor, text_sensor, number, and select reads:
/// the current state rendered as a string (numeric entities report a
/// numeric string).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateValue {
    #[serde(default)]
    pub state: Option<String>,
}
