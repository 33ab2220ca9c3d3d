//! Shared response envelope for API handlers.
//!
//! Every response, success or failure, uses the
//! `{ "status": "success" | "fail", "message": ..., "data"?: ... }` shape.
//! Use [`Envelope`] instead of ad-hoc `serde_json::json!` bodies so the shape
//! is checked at compile time.

use serde::{Deserialize, Serialize};

/// Outcome marker carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Fail,
}

/// Standard `{ status, message, data? }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(Envelope::success("Kit created successfully", kit)))
/// ```
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: EnvelopeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// A failure envelope with no payload.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Fail,
            message: message.into(),
            data: None,
        }
    }
}
