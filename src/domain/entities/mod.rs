//! Core domain entities of the link-check pipeline.
//!
//! Entities are plain data structures; the only behaviour they carry is
//! validation ([`TargetUrl::parse`]) and the verdict reduction
//! ([`Verdict::from_outcomes`]), both pure and free of I/O.
//!
//! # Entity Types
//!
//! - [`TargetUrl`] - Validated, normalized URL under inspection
//! - [`ProviderOutcome`] - One provider's answer, reduced to an [`OutcomeState`]
//! - [`Verdict`] - The aggregated safe/warning/danger result
//! - [`ScanRecord`] - A history entry stored for an identified caller

pub mod outcome;
pub mod scan_record;
pub mod target_url;
pub mod verdict;

pub use outcome::{OutcomeState, ProviderOutcome};
pub use scan_record::{CallerIdentity, NewScanRecord, ScanRecord, ScanSource};
pub use target_url::{TargetUrl, TargetUrlError};
pub use verdict::{
    DANGER_SCORE, DEGRADED_NOTICE, DEGRADED_SCORE, NO_PROVIDER, SAFE_SCORE, SUSPICIOUS_SCORE,
    Verdict, VerdictStatus,
};
