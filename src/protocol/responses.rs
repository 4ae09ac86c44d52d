//! HTTP response bodies
//!
//! Mutating endpoints answer with the same `{ok, error?}` shape.

use serde::Serialize;

/// Uniform result of a file operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpResponse {
    pub fn success() -> Self {
        Self { ok: true, error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}
