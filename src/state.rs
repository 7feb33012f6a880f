//! Shared application state.

use std::sync::Arc;

use crate::application::services::{HistoryService, LinkCheckService};
use crate::infrastructure::cache::VerdictCache;

/// State injected into every handler.
///
/// Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_check_service: Arc<LinkCheckService>,
    pub history_service: Arc<HistoryService>,
    pub cache: Arc<dyn VerdictCache>,
}

impl AppState {
    pub fn new(
        link_check_service: Arc<LinkCheckService>,
        history_service: Arc<HistoryService>,
        cache: Arc<dyn VerdictCache>,
    ) -> Self {
        Self {
            link_check_service,
            history_service,
            cache,
        }
    }
}
