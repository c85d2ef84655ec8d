//! Queries for the Shipment Tracking context.

use serde::Deserialize;

/// Raw query-string parameters of a history request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQueryParams {
    /// Page size; defaults to 50.
    pub limit: Option<String>,
    /// Opaque cursor from a previous page.
    #[serde(rename = "startKey")]
    pub start_key: Option<String>,
}

/// Query for one page of a shipment's event history.
#[derive(Debug, Clone)]
pub struct GetEventHistory {
    /// The shipment whose events are listed.
    pub shipment_id: String,
    /// Unvalidated paging parameters.
    pub params: HistoryQueryParams,
}
