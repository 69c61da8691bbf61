//! Persistence of confirmed procurement requests.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::procurement::ProcurementData;
use crate::models::request::{ProcurementRequest, RequestStatus, StatusChange};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Trait for request stores.
pub trait RequestStore {
    /// Persist a confirmed request with its order lines. New requests are `Open`.
    fn create(&mut self, data: ProcurementData) -> Result<ProcurementRequest>;

    /// Fetch a request by id.
    fn get(&self, request_id: u64) -> Result<ProcurementRequest>;

    /// All requests, newest first.
    fn list(&self) -> Vec<ProcurementRequest>;

    /// Change a request's status and append an audit entry.
    ///
    /// `user` defaults to [`DEFAULT_CHANGER`](crate::models::request::DEFAULT_CHANGER).
    fn update_status(
        &mut self,
        request_id: u64,
        status: RequestStatus,
        user: Option<&str>,
    ) -> Result<StatusChange>;

    /// Audit entries for a request, oldest first.
    fn history(&self, request_id: u64) -> Result<Vec<StatusChange>>;
}
