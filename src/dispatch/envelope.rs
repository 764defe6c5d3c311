//! The response wrapper returned for every message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DispatchError;

/// `{success, data?, error?}`; absent fields are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the request succeeded.
    pub success: bool,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error description for failed requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// A successful response carrying `data`.
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A response whose success flag is decided by the caller.
    #[must_use]
    pub const fn with_status(success: bool, data: Value) -> Self {
        Self {
            success,
            data: Some(data),
            error: None,
        }
    }

    /// A failed response describing `error`.
    #[must_use]
    pub fn failure(error: &DispatchError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// A failed response with a free-form message.
    #[must_use]
    pub fn failure_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
