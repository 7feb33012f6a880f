//! History store used when no database is configured.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::{NewScanRecord, ScanRecord};
use crate::domain::repositories::ScanRecordRepository;
use crate::error::AppError;

/// Accepts appends without storing them and always reports an empty history.
pub struct NullScanRecordRepository;

impl NullScanRecordRepository {
    pub fn new() -> Self {
        debug!("Using NullScanRecordRepository (history disabled)");
        Self
    }
}

impl Default for NullScanRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanRecordRepository for NullScanRecordRepository {
    async fn append(&self, record: NewScanRecord) -> Result<ScanRecord, AppError> {
        Ok(ScanRecord {
            id: 0,
            url: record.url,
            status: record.status,
            score: record.score,
            source: record.source,
            created_at: record.created_at,
            owner_id: record.owner_id,
        })
    }

    async fn recent_for_owner(
        &self,
        _owner_id: &str,
        _limit: i64,
    ) -> Result<Vec<ScanRecord>, AppError> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
