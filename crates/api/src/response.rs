//! Shared response envelope for API handlers.
//!
//! Every operation answers with `{ "success", "message", ... }` where the
//! remaining keys are the echoed input parameters and the payload. Build it
//! with [`ActionResponse`] instead of ad-hoc `json!` so the envelope stays
//! consistent.

use serde::Serialize;

/// `{ "success": bool, "message": String, ...data }` envelope.
///
/// `data` must serialize as a map; its keys are flattened into the envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ActionResponse::ok("Feature created", feature)))
/// ```
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
