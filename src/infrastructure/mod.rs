//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for reputation lookups, history storage and caching.
//!
//! # Modules
//!
//! - [`cache`] - Verdict cache (Redis and no-op implementations)
//! - [`persistence`] - Scan history repositories
//! - [`providers`] - VirusTotal and Google Safe Browsing adapters

pub mod cache;
pub mod persistence;
pub mod providers;
