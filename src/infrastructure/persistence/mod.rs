//! Scan history repository implementations.
//!
//! - [`PgScanRecordRepository`] - PostgreSQL-backed history
//! - [`NullScanRecordRepository`] - No-op history when no database is configured

pub mod null_scan_record_repository;
pub mod pg_scan_record_repository;

pub use null_scan_record_repository::NullScanRecordRepository;
pub use pg_scan_record_repository::PgScanRecordRepository;
