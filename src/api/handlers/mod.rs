//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod history;
pub mod linkcheck;

pub use health::health_handler;
pub use history::history_handler;
pub use linkcheck::linkcheck_handler;
