//! Repository trait for scan history.

use crate::domain::entities::{NewScanRecord, ScanRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of scan history entries.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgScanRecordRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::NullScanRecordRepository`] - history disabled
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanRecordRepository: Send + Sync {
    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn append(&self, record: NewScanRecord) -> Result<ScanRecord, AppError>;

    /// Returns at most `limit` records of `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn recent_for_owner(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<ScanRecord>, AppError>;

    /// Checks whether the backing store is reachable.
    async fn health_check(&self) -> bool;
}
