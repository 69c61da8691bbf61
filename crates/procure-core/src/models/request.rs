//! Persisted procurement requests and their status audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::procurement::ProcurementData;

/// User recorded on a status change when the caller names nobody.
pub const DEFAULT_CHANGER: &str = "Procurement Manager";

/// Workflow status of a procurement request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Newly submitted.
    #[default]
    Open,
    /// Being handled by procurement.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Ordered or rejected.
    Closed,
}

impl RequestStatus {
    /// Label used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Open => "Open",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed procurement request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRequest {
    pub request_id: u64,

    #[serde(flatten)]
    pub data: ProcurementData,

    pub status: RequestStatus,

    pub created_at: DateTime<Utc>,
}

/// One entry of the status audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub history_id: u64,
    pub request_id: u64,
    pub old_status: Option<RequestStatus>,
    pub new_status: RequestStatus,
    pub changer_user: String,
    pub change_timestamp: DateTime<Utc>,
}
