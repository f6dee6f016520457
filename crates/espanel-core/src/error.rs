use thiserror::Error;

/// Errors surfaced by the panel layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Wire-level failure from the device client.
    #[error(transparent)]
    Api(#[from] espanel_api::Error),

    /// A name that does not exist in the panel's entity map.
    #[error("Unknown {class} '{name}'")]
    UnknownEntity { class: &'static str, name: String },

    /// Slot index outside 1..=16.
    #[error("Slot index {index} out of range (1-16)")]
    SlotOutOfRange { index: u8 },

    /// A relay write failed; the control should revert to `reverted_to`.
    #[error("Switch write to '{id}' failed (reverted to {}): {source}", if *.reverted_to { "ON" } else { "OFF" })]
    ToggleFailed {
        id: String,
        reverted_to: bool,
        #[source]
        source: espanel_api::Error,
    },
}

impl CoreError {
    /// Returns `true` if the device rejected the entity identifier.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(e) => e.is_not_found(),
            Self::UnknownEntity { .. } | Self::SlotOutOfRange { .. } => true,
            Self::ToggleFailed { .. } => false,
        }
    }
}
