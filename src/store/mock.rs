use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::RecordStore;
use super::error::StoreError;
use super::model::{CafeDetails, CafeRecord};

/// In-memory record store for tests, with a failure toggle for exercising
/// upstream-error paths.
#[derive(Clone, Default)]
pub struct MockRecordStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    records: RwLock<HashMap<String, CafeRecord>>,
    fail: AtomicBool,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.inner.fail.store(failing, Ordering::SeqCst);
    }

    pub fn record_count(&self) -> usize {
        self.inner.records.read().len()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(StoreError::QueryFailed {
                message: "mock store failure".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for MockRecordStore {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<CafeRecord>, StoreError> {
        self.check_failure()?;

        let records = self.inner.records.read();
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn get_by_list_id(&self, list_id: &str) -> Result<Option<CafeRecord>, StoreError> {
        self.check_failure()?;

        let records = self.inner.records.read();
        Ok(records.values().find(|r| r.list_id == list_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<CafeRecord>, StoreError> {
        self.check_failure()?;

        let records = self.inner.records.read();
        let mut all: Vec<CafeRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn insert(&self, record: &CafeRecord) -> Result<(), StoreError> {
        self.check_failure()?;

        self.inner
            .records
            .write()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update_details(
        &self,
        list_id: &str,
        details: &CafeDetails,
        now: DateTime<Utc>,
    ) -> Result<CafeRecord, StoreError> {
        self.check_failure()?;

        let mut records = self.inner.records.write();
        let record = records
            .values_mut()
            .find(|r| r.list_id == list_id)
            .ok_or_else(|| StoreError::NotFound {
                list_id: list_id.to_string(),
            })?;

        record.description = details.description.clone();
        record.my_comment = details.my_comment.clone();
        record.instagram = details.instagram.clone();
        record.keywords = details.keywords.clone();
        record.updated_at = now;

        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.check_failure()?;

        Ok(self.inner.records.write().remove(id).is_some())
    }
}
