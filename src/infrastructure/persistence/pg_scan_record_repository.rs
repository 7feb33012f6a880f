//! PostgreSQL implementation of the scan history repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewScanRecord, ScanRecord};
use crate::domain::repositories::ScanRecordRepository;
use crate::error::AppError;

/// Raw `scan_records` row before enum columns are decoded.
#[derive(Debug, sqlx::FromRow)]
struct ScanRecordRow {
    id: i64,
    owner_id: String,
    url: String,
    status: String,
    score: i16,
    scan_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScanRecordRow> for ScanRecord {
    type Error = AppError;

    fn try_from(row: ScanRecordRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| {
            AppError::internal(
                "Corrupt scan record",
                serde_json::json!({ "id": row.id, "reason": reason }),
            )
        };

        Ok(ScanRecord {
            id: row.id,
            status: row.status.parse().map_err(corrupt)?,
            source: row.scan_type.parse().map_err(corrupt)?,
            score: u8::try_from(row.score).map_err(|e| corrupt(e.to_string()))?,
            url: row.url,
            created_at: row.created_at,
            owner_id: row.owner_id,
        })
    }
}

/// PostgreSQL repository for scan history.
pub struct PgScanRecordRepository {
    pool: Arc<PgPool>,
}

impl PgScanRecordRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanRecordRepository for PgScanRecordRepository {
    async fn append(&self, record: NewScanRecord) -> Result<ScanRecord, AppError> {
        let row = sqlx::query_as::<_, ScanRecordRow>(
            r#"
            INSERT INTO scan_records (owner_id, url, status, score, scan_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, url, status, score, scan_type, created_at
            "#,
        )
        .bind(&record.owner_id)
        .bind(&record.url)
        .bind(record.status.as_str())
        .bind(i16::from(record.score))
        .bind(record.source.as_str())
        .bind(record.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn recent_for_owner(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<ScanRecord>, AppError> {
        let rows = sqlx::query_as::<_, ScanRecordRow>(
            r#"
            SELECT id, owner_id, url, status, score, scan_type, created_at
            FROM scan_records
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ScanRecord::try_from).collect()
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
