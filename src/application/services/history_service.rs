//! Read side of the scan history.

use std::sync::Arc;

use crate::domain::entities::{CallerIdentity, ScanRecord};
use crate::domain::repositories::ScanRecordRepository;
use crate::error::AppError;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Lists a caller's most recent checks.
pub struct HistoryService {
    repository: Arc<dyn ScanRecordRepository>,
}

impl HistoryService {
    pub fn new(repository: Arc<dyn ScanRecordRepository>) -> Self {
        Self { repository }
    }

    /// Returns up to `limit` records for `owner`, newest first.
    ///
    /// `limit` defaults to 20 and is clamped to `1..=100`.
    pub async fn recent(
        &self,
        owner: &CallerIdentity,
        limit: Option<i64>,
    ) -> Result<Vec<ScanRecord>, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        self.repository
            .recent_for_owner(owner.as_str(), limit)
            .await
    }

    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}
