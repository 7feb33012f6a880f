//! Business logic services for the application layer.

pub mod aggregator;
pub mod history_service;
pub mod link_check_service;

pub use aggregator::VerdictAggregator;
pub use history_service::{DEFAULT_HISTORY_LIMIT, HistoryService, MAX_HISTORY_LIMIT};
pub use link_check_service::LinkCheckService;
