//! Cafe record store (libSQL).
//!
//! The search pipeline only hydrates records by id; the admin CRUD surface
//! owns the rest of the interface. Both go through [`RecordStore`] so tests
//! and alternative backends can swap in without touching callers.

pub mod error;
pub mod libsql;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use error::StoreError;
pub use libsql::LibsqlStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRecordStore;
pub use model::{CafeDetails, CafeRecord};

use chrono::{DateTime, Utc};

/// Minimal async interface over the cafe record backing store.
pub trait RecordStore: Send + Sync {
    /// Batch lookup by record id. Order is not guaranteed and missing ids
    /// are silently absent from the result.
    fn find_by_ids(
        &self,
        ids: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<CafeRecord>, StoreError>> + Send;

    /// Looks up a record by its external place id.
    fn get_by_list_id(
        &self,
        list_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<CafeRecord>, StoreError>> + Send;

    /// Returns every record, newest first.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<CafeRecord>, StoreError>> + Send;

    /// Persists a freshly created record.
    fn insert(
        &self,
        record: &CafeRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Applies curator-editable detail fields to the record identified by
    /// `list_id` and returns the updated record.
    fn update_details(
        &self,
        list_id: &str,
        details: &CafeDetails,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<CafeRecord, StoreError>> + Send;

    /// Deletes by record id; returns `false` if nothing matched.
    fn delete(&self, id: &str)
    -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;
}
