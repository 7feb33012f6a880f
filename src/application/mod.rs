//! Application layer services implementing the check and history use cases.
//!
//! Services consume domain traits (providers, repositories) and the verdict
//! cache, and expose a small API for HTTP handlers and the CLI.
//!
//! # Available Services
//!
//! - [`services::aggregator::VerdictAggregator`] - Concurrent provider fan-out with deadlines
//! - [`services::link_check_service::LinkCheckService`] - Validate, check, cache and record one URL
//! - [`services::history_service::HistoryService`] - Recent checks of an identified caller

pub mod services;
