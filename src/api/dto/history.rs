//! DTOs for the scan history endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::ScanRecord;

/// Query parameters for `GET /api/history`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub items: Vec<ScanRecord>,
}
