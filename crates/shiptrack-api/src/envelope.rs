//! Uniform response envelope.
//!
//! Every response body has the shape
//! `{ success, data?, error?, message?, pagination? }`. Fields that do not
//! apply are left out of the JSON entirely rather than sent as `null`.

use serde::Serialize;

/// Pagination block attached to history responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Whether another page follows.
    pub has_more: bool,
    /// Opaque cursor to pass back as `startKey`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_key: Option<String>,
}

/// Response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// `true` for 2xx responses.
    pub success: bool,
    /// Payload of a successful response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Short error description of a failed response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Paging state, on history responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
            pagination: None,
        }
    }

    /// Attaches a pagination block.
    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// A failed response.
    pub fn failure(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message,
            pagination: None,
        }
    }
}
