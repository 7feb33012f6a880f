#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use linkcheck::application::services::{HistoryService, LinkCheckService, VerdictAggregator};
use linkcheck::domain::entities::{
    NewScanRecord, OutcomeState, ProviderOutcome, ScanRecord, TargetUrl,
};
use linkcheck::domain::providers::ReputationProvider;
use linkcheck::domain::repositories::ScanRecordRepository;
use linkcheck::error::AppError;
use linkcheck::infrastructure::cache::NullCache;
use linkcheck::state::AppState;

/// Provider answering with a fixed outcome and counting its calls.
pub struct StubProvider {
    name: &'static str,
    state: OutcomeState,
    detail: &'static str,
    raw: Option<Value>,
    calls: Mutex<usize>,
}

impl StubProvider {
    pub fn new(name: &'static str, state: OutcomeState, detail: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            state,
            detail,
            raw: None,
            calls: Mutex::new(0),
        })
    }

    pub fn with_raw(
        name: &'static str,
        state: OutcomeState,
        detail: &'static str,
        raw: Value,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            state,
            detail,
            raw: Some(raw),
            calls: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ReputationProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn query(&self, _url: &TargetUrl) -> ProviderOutcome {
        *self.calls.lock().unwrap() += 1;
        let outcome = ProviderOutcome::new(self.name, self.state, self.detail);
        match &self.raw {
            Some(raw) => outcome.with_raw(raw.clone()),
            None => outcome,
        }
    }
}

/// History store kept in memory; notifies on every append.
#[derive(Default)]
pub struct InMemoryHistory {
    records: Mutex<Vec<ScanRecord>>,
    pub appended: Notify,
}

impl InMemoryHistory {
    pub fn records(&self) -> Vec<ScanRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn seed(&self, record: ScanRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Waits until at least `count` records exist.
    pub async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let notified = self.appended.notified();
                if self.records.lock().unwrap().len() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .expect("history append did not happen");
    }
}

#[async_trait]
impl ScanRecordRepository for InMemoryHistory {
    async fn append(&self, record: NewScanRecord) -> Result<ScanRecord, AppError> {
        let stored = {
            let mut records = self.records.lock().unwrap();
            let stored = ScanRecord {
                id: records.len() as i64 + 1,
                url: record.url,
                status: record.status,
                score: record.score,
                source: record.source,
                created_at: record.created_at,
                owner_id: record.owner_id,
            };
            records.push(stored.clone());
            stored
        };
        self.appended.notify_waiters();
        Ok(stored)
    }

    async fn recent_for_owner(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<ScanRecord>, AppError> {
        let mut records: Vec<ScanRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub fn create_test_state(
    providers: Vec<Arc<dyn ReputationProvider>>,
    history: Arc<InMemoryHistory>,
) -> AppState {
    let aggregator = Arc::new(VerdictAggregator::new(
        providers,
        Duration::from_secs(15),
        Duration::from_secs(20),
    ));
    let cache = Arc::new(NullCache::new());

    let link_check_service = Arc::new(LinkCheckService::new(
        aggregator,
        cache.clone(),
        history.clone(),
        None,
    ));
    let history_service = Arc::new(HistoryService::new(history));

    AppState::new(link_check_service, history_service, cache)
}
