use serde::{Deserialize, Serialize};

/// One security from a dataset snapshot. Any ratio may be NaN when the source
/// cell was missing or unparseable; `ticker` is always non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub ticker: String,
    pub peg_ratio: f64,
    pub price_to_book: f64,
    pub price_to_earnings: f64,
    pub return_on_equity: f64,
    pub dividend_yield: f64,
    pub dividend_payout_ratio: f64,
}

/// A record annotated with its composite score. Scores are only comparable
/// within the same profile and the same filtered batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredStock {
    pub record: StockRecord,
    pub score: f64,
}
