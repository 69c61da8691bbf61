//! In-memory request store.

use chrono::Utc;
use tracing::{debug, info};

use super::{RequestStore, Result};
use crate::error::StoreError;
use crate::models::procurement::ProcurementData;
use crate::models::request::{DEFAULT_CHANGER, ProcurementRequest, RequestStatus, StatusChange};

/// Request store kept in process memory. Ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    requests: Vec<ProcurementRequest>,
    history: Vec<StatusChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn find_mut(&mut self, request_id: u64) -> Result<&mut ProcurementRequest> {
        self.requests
            .iter_mut()
            .find(|r| r.request_id == request_id)
            .ok_or(StoreError::NotFound(request_id))
    }
}

fn check_required(data: &ProcurementData) -> Result<()> {
    let required = [
        ("requestor_name", &data.requestor_name),
        ("title", &data.title),
        ("department", &data.department),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(StoreError::MissingField(field));
        }
    }
    Ok(())
}

impl RequestStore for MemoryStore {
    fn create(&mut self, data: ProcurementData) -> Result<ProcurementRequest> {
        check_required(&data)?;

        let request = ProcurementRequest {
            request_id: self.requests.len() as u64 + 1,
            data,
            status: RequestStatus::Open,
            created_at: Utc::now(),
        };
        info!(id = request.request_id, title = %request.data.title, "Created request");

        self.requests.push(request.clone());
        Ok(request)
    }

    fn get(&self, request_id: u64) -> Result<ProcurementRequest> {
        self.requests
            .iter()
            .find(|r| r.request_id == request_id)
            .cloned()
            .ok_or(StoreError::NotFound(request_id))
    }

    fn list(&self) -> Vec<ProcurementRequest> {
        let mut requests = self.requests.clone();
        // Ids break ties between requests created in the same instant.
        requests.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.request_id.cmp(&a.request_id))
        });
        requests
    }

    fn update_status(
        &mut self,
        request_id: u64,
        status: RequestStatus,
        user: Option<&str>,
    ) -> Result<StatusChange> {
        let history_id = self.history.len() as u64 + 1;
        let request = self.find_mut(request_id)?;
        let old_status = request.status;
        request.status = status;

        let change = StatusChange {
            history_id,
            request_id,
            old_status: Some(old_status),
            new_status: status,
            changer_user: user.unwrap_or(DEFAULT_CHANGER).to_string(),
            change_timestamp: Utc::now(),
        };
        debug!(id = request_id, from = %old_status, to = %status, "Status changed");

        self.history.push(change.clone());
        Ok(change)
    }

    fn history(&self, request_id: u64) -> Result<Vec<StatusChange>> {
        self.get(request_id)?;
        Ok(self
            .history
            .iter()
            .filter(|c| c.request_id == request_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data(title: &str) -> ProcurementData {
        let mut data = ProcurementData::extraction_error("Jane Roe", "IT");
        data.title = title.to_string();
        data
    }

    #[test]
    fn test_create_and_get() {
        let mut store = MemoryStore::new();
        let created = store.create(data("Laptops")).unwrap();

        assert_eq!(created.request_id, 1);
        assert_eq!(created.status, RequestStatus::Open);
        assert_eq!(store.get(1).unwrap(), created);
        assert_eq!(store.get(2).unwrap_err(), StoreError::NotFound(2));
    }

    #[test]
    fn test_create_rejects_blank_required_fields() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.create(data(" ")).unwrap_err(),
            StoreError::MissingField("title")
        );

        let mut missing_department = data("Desks");
        missing_department.department.clear();
        assert_eq!(
            store.create(missing_department).unwrap_err(),
            StoreError::MissingField("department")
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let mut store = MemoryStore::new();
        store.create(data("First")).unwrap();
        store.create(data("Second")).unwrap();
        store.create(data("Third")).unwrap();

        let titles: Vec<String> = store.list().into_iter().map(|r| r.data.title).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
    }

    #[test]
    fn test_status_updates_are_audited() {
        let mut store = MemoryStore::new();
        let id = store.create(data("Chairs")).unwrap().request_id;

        let first = store
            .update_status(id, RequestStatus::InProgress, None)
            .unwrap();
        assert_eq!(first.old_status, Some(RequestStatus::Open));
        assert_eq!(first.changer_user, "Procurement Manager");

        let second = store
            .update_status(id, RequestStatus::Closed, Some("Jane Roe"))
            .unwrap();
        assert_eq!(second.old_status, Some(RequestStatus::InProgress));
        assert_eq!(second.changer_user, "Jane Roe");

        assert_eq!(store.get(id).unwrap().status, RequestStatus::Closed);
        assert_eq!(store.history(id).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_update_unknown_request() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store
                .update_status(7, RequestStatus::Closed, None)
                .unwrap_err(),
            StoreError::NotFound(7)
        );
        assert_eq!(store.history(7).unwrap_err(), StoreError::NotFound(7));
    }
}
