use crate::domain::stock::ScoredStock;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// Interpretation thresholds inherited from the product guidance; documented
/// constants only, no recalibration logic behind them.
pub const STRONG_ABOVE: f64 = 5.0;
pub const AVERAGE_FROM: f64 = 1.0;

/// Presentation band for a composite score: `> 5` strong, `1..=5` average,
/// `< 1` below average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Average,
    BelowAverage,
}

impl ScoreBand {
    /// `None` for a NaN score; a record with no computable score has no band.
    pub fn classify(score: f64) -> Option<ScoreBand> {
        if score.is_nan() {
            return None;
        }
        if score > STRONG_ABOVE {
            Some(ScoreBand::Strong)
        } else if score >= AVERAGE_FROM {
            Some(ScoreBand::Average)
        } else {
            Some(ScoreBand::BelowAverage)
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreBand::Strong => "Strong Candidate",
            ScoreBand::Average => "Average Candidate",
            ScoreBand::BelowAverage => "Below Average Candidate",
        };
        f.write_str(s)
    }
}

/// Writes the ranked result set as CSV, one row per scored record in rank
/// order. NaN cells are written empty.
pub fn write_ranked_csv<W: Write>(writer: W, items: &[ScoredStock]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "RANK", "TICKER", "PEG", "PTB", "PE", "ROE", "DIVY", "DPR", "SCORE",
    ])
    .context("write export header failed")?;

    for (i, item) in items.iter().enumerate() {
        let r = &item.record;
        csv.write_record([
            (i + 1).to_string(),
            r.ticker.clone(),
            cell(r.peg_ratio),
            cell(r.price_to_book),
            cell(r.price_to_earnings),
            cell(r.return_on_equity),
            cell(r.dividend_yield),
            cell(r.dividend_payout_ratio),
            cell(item.score),
        ])
        .with_context(|| format!("write export row for {} failed", r.ticker))?;
    }

    csv.flush().context("flush export failed")?;
    Ok(())
}

fn cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::StockRecord;

    #[test]
    fn bands_follow_the_documented_thresholds() {
        assert_eq!(ScoreBand::classify(7.2), Some(ScoreBand::Strong));
        // Exactly 5 is still average; only scores above the threshold are
        // strong.
        assert_eq!(ScoreBand::classify(5.0), Some(ScoreBand::Average));
        assert_eq!(ScoreBand::classify(1.0), Some(ScoreBand::Average));
        assert_eq!(ScoreBand::classify(0.99), Some(ScoreBand::BelowAverage));
        assert_eq!(ScoreBand::classify(f64::NAN), None);
    }

    #[test]
    fn export_writes_ranks_and_blank_nan_cells() {
        let items = vec![
            ScoredStock {
                record: StockRecord {
                    ticker: "AAA".to_string(),
                    peg_ratio: 1.0,
                    price_to_book: 2.0,
                    price_to_earnings: 10.0,
                    return_on_equity: 0.15,
                    dividend_yield: 0.02,
                    dividend_payout_ratio: 0.3,
                },
                score: 0.75,
            },
            ScoredStock {
                record: StockRecord {
                    ticker: "BBB".to_string(),
                    peg_ratio: f64::NAN,
                    price_to_book: 1.0,
                    price_to_earnings: 5.0,
                    return_on_equity: 0.3,
                    dividend_yield: 0.01,
                    dividend_payout_ratio: 0.2,
                },
                score: f64::NAN,
            },
        ];

        let mut buf = Vec::new();
        write_ranked_csv(&mut buf, &items).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "RANK,TICKER,PEG,PTB,PE,ROE,DIVY,DPR,SCORE"
        );
        assert_eq!(lines.next().unwrap(), "1,AAA,1,2,10,0.15,0.02,0.3,0.75");
        assert_eq!(lines.next().unwrap(), "2,BBB,,1,5,0.3,0.01,0.2,");
        assert!(lines.next().is_none());
    }
}
