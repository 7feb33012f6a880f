//! HTTP adapters for upstream reputation services.
//!
//! Each adapter implements [`crate::domain::providers::ReputationProvider`]
//! and converts every failure into an outcome state at its own boundary.
//!
//! - [`VirusTotalProvider`] - report lookup with submit-then-poll fallback
//! - [`SafeBrowsingProvider`] - threat-list lookup over URL variants

pub mod http;
pub mod safe_browsing;
pub mod virustotal;

pub use http::{ProviderError, RetryPolicy};
pub use safe_browsing::{SAFE_BROWSING, SafeBrowsingProvider, SafeBrowsingSettings};
pub use virustotal::{VIRUSTOTAL, VirusTotalProvider, VirusTotalSettings};
