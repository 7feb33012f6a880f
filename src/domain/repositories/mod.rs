//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`ScanRecordRepository`] - Scan history append and per-owner lookup

pub mod scan_record_repository;

pub use scan_record_repository::ScanRecordRepository;

#[cfg(test)]
pub use scan_record_repository::MockScanRecordRepository;
