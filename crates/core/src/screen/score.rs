use crate::domain::profile::{InvestorProfile, RatioWeights};
use crate::domain::stock::{ScoredStock, StockRecord};
use std::cmp::Ordering;

/// Computes the composite score for each record and returns the batch sorted
/// descending by score. NaN scores sort after every numeric score; ties keep
/// their input order (stable sort).
pub fn score(records: &[StockRecord], profile: InvestorProfile) -> Vec<ScoredStock> {
    let weights = profile.weights();
    let mut out: Vec<ScoredStock> = records
        .iter()
        .map(|r| ScoredStock {
            score: composite_score(r, weights),
            record: r.clone(),
        })
        .collect();
    out.sort_by(|a, b| compare_desc_nan_last(a.score, b.score));
    out
}

/// "Lower is better" ratios contribute `weight / value`, "higher is better"
/// ratios contribute `weight * value`. A NaN ratio makes the whole score NaN.
fn composite_score(r: &StockRecord, w: &RatioWeights) -> f64 {
    w.peg_ratio / zero_guard(r.peg_ratio)
        + w.price_to_book / zero_guard(r.price_to_book)
        + w.price_to_earnings / zero_guard(r.price_to_earnings)
        + w.return_on_equity * r.return_on_equity
        + w.dividend_yield * r.dividend_yield
        + w.dividend_payout_ratio / zero_guard(r.dividend_payout_ratio)
}

/// A true zero divisor is substituted with 1, scoring the term as if the
/// ratio were 1 instead of dropping the record or producing an infinity.
/// Known distortion, kept to preserve observable ranking behavior.
fn zero_guard(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x
    }
}

fn compare_desc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
