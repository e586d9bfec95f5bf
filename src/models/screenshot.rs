//! Screenshot model for UI test steps.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Screenshot captured during a UI test step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: i64,
    /// Parent run ID
    pub run_id: i64,
    pub step_number: i64,
    pub step_name: String,
    /// Base64-encoded image bytes; empty when the host stored no image
    #[serde(default)]
    pub image_data: String,
    pub created_at: String,
}

impl Screenshot {
    /// Whether the host sent image bytes with this screenshot.
    pub fn has_image(&self) -> bool {
        !self.image_data.is_empty()
    }

    /// Decode the image bytes.
    pub fn decode_image(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.image_data)
    }
}
