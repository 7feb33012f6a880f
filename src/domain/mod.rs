//! Domain layer containing the link-check entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - URL, outcome, verdict and history data structures
//! - [`providers`] - Reputation provider trait implemented by upstream adapters
//! - [`repositories`] - History store trait implemented by the persistence layer
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Provider and repository traits define contracts implemented by infrastructure
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Check Flow
//!
//! 1. HTTP handler receives the raw URL
//! 2. [`entities::TargetUrl`] validates and normalizes it
//! 3. Every [`providers::ReputationProvider`] yields an [`entities::ProviderOutcome`]
//! 4. [`entities::Verdict::from_outcomes`] reduces them to one verdict
//! 5. Identified callers get a history entry via [`repositories::ScanRecordRepository`]

pub mod entities;
pub mod providers;
pub mod repositories;
