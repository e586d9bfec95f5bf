//! Screenshot records stored with raw image bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use crate::models::Screenshot;

use super::format_timestamp;

/// Screenshot to attach to a new run.
#[derive(Debug, Clone)]
pub struct NewScreenshot {
    pub step_number: i64,
    pub step_name: String,
    pub image: Vec<u8>,
}

/// Screenshot as held by the store.
#[derive(Debug, Clone)]
pub struct StoredScreenshot {
    pub id: i64,
    pub run_id: i64,
    pub step_number: i64,
    pub step_name: String,
    pub image: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl StoredScreenshot {
    /// Convert to the wire model with base64 image data.
    pub fn to_model(&self) -> Screenshot {
        Screenshot {
            id: self.id,
            run_id: self.run_id,
            step_number: self.step_number,
            step_name: self.step_name.clone(),
            image_data: if self.image.is_empty() {
                String::new()
            } else {
                STANDARD.encode(&self.image)
            },
            created_at: format_timestamp(self.created_at),
        }
    }
}
