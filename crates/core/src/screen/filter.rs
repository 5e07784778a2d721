use crate::domain::stock::StockRecord;
use serde::{Deserialize, Serialize};

/// Sentinel for an open upper bound. Large enough to pass every real ratio
/// while keeping the comparison itself in place, so NaN fields still fail it.
pub const NO_MAX: f64 = 1_000_000.0;

/// Threshold set for one screening run. Closed `[min, max]` ranges for the
/// valuation ratios, lower bounds only for the return ratios, upper bound
/// only for the payout ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub peg_min: f64,
    pub peg_max: f64,
    pub pb_min: f64,
    pub pb_max: f64,
    pub pe_min: f64,
    pub pe_max: f64,
    pub roe_min: f64,
    pub dy_min: f64,
    pub dpr_max: f64,
}

impl Default for FilterCriteria {
    /// Permissive criteria: every record with fully numeric, non-negative
    /// ratios passes.
    fn default() -> Self {
        Self {
            peg_min: 0.0,
            peg_max: NO_MAX,
            pb_min: 0.0,
            pb_max: NO_MAX,
            pe_min: 0.0,
            pe_max: NO_MAX,
            roe_min: 0.0,
            dy_min: 0.0,
            dpr_max: NO_MAX,
        }
    }
}

impl FilterCriteria {
    /// All nine inequalities must hold. A NaN field makes its comparison
    /// false, so a record missing any screened ratio is dropped.
    pub fn matches(&self, r: &StockRecord) -> bool {
        r.peg_ratio >= self.peg_min
            && r.peg_ratio <= self.peg_max
            && r.price_to_book >= self.pb_min
            && r.price_to_book <= self.pb_max
            && r.price_to_earnings >= self.pe_min
            && r.price_to_earnings <= self.pe_max
            && r.return_on_equity >= self.roe_min
            && r.dividend_yield >= self.dy_min
            && r.dividend_payout_ratio <= self.dpr_max
    }
}

/// Returns the records satisfying `criteria`, preserving input order.
pub fn filter(records: &[StockRecord], criteria: &FilterCriteria) -> Vec<StockRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, pe: f64) -> StockRecord {
        StockRecord {
            ticker: ticker.to_string(),
            peg_ratio: 1.0,
            price_to_book: 2.0,
            price_to_earnings: pe,
            return_on_equity: 0.15,
            dividend_yield: 0.02,
            dividend_payout_ratio: 0.3,
        }
    }

    #[test]
    fn default_criteria_keeps_numeric_records() {
        let records = vec![record("A", 10.0), record("B", 25.0)];
        let out = filter(&records, &FilterCriteria::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn bounds_are_inclusive() {
        let criteria = FilterCriteria {
            pe_min: 10.0,
            pe_max: 10.0,
            ..FilterCriteria::default()
        };
        assert!(criteria.matches(&record("A", 10.0)));
        assert!(!criteria.matches(&record("B", 10.01)));
        assert!(!criteria.matches(&record("C", 9.99)));
    }

    #[test]
    fn nan_field_is_excluded_under_any_finite_range() {
        let records = vec![record("A", 10.0), record("B", f64::NAN), record("C", 5.0)];
        let out = filter(&records, &FilterCriteria::default());
        let tickers: Vec<_> = out.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["A", "C"]);
    }

    #[test]
    fn nan_field_is_excluded_even_when_only_the_open_bound_applies() {
        // The NO_MAX sentinel keeps the upper-bound comparison in place, so a
        // NaN payout ratio still fails it.
        let mut r = record("A", 10.0);
        r.dividend_payout_ratio = f64::NAN;
        assert!(!FilterCriteria::default().matches(&r));
    }

    #[test]
    fn preserves_input_order() {
        let records = vec![
            record("Z", 30.0),
            record("M", 8.0),
            record("A", 12.0),
            record("Q", 50.0),
        ];
        let criteria = FilterCriteria {
            pe_max: 20.0,
            ..FilterCriteria::default()
        };
        let tickers: Vec<_> = filter(&records, &criteria)
            .iter()
            .map(|r| r.ticker.clone())
            .collect();
        assert_eq!(tickers, vec!["M", "A"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = vec![record("A", 10.0), record("B", 40.0), record("C", 15.0)];
        let criteria = FilterCriteria {
            pe_max: 20.0,
            ..FilterCriteria::default()
        };
        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.ticker, b.ticker);
        }
    }

    #[test]
    fn empty_result_is_valid_output() {
        let records = vec![record("A", 10.0)];
        let criteria = FilterCriteria {
            pe_min: 100.0,
            ..FilterCriteria::default()
        };
        assert!(filter(&records, &criteria).is_empty());
    }
}
