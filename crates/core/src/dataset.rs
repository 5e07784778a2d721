use crate::domain::stock::StockRecord;
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;

/// An immutable load of the source dataset. Records are constructed once per
/// load and never mutated afterwards; filtering and scoring derive new
/// collections from them.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub records: Vec<StockRecord>,
}

const TICKER_COL: &str = "TICKER";
const PEG_COL: &str = "PEG";
const PTB_COL: &str = "PTB";
const PE_COL: &str = "PE";
const ROE_COL: &str = "ROE";
const DIVY_COL: &str = "DIVY";
const DPR_COL: &str = "DPR";

pub fn load_csv(path: impl AsRef<Path>) -> anyhow::Result<DatasetSnapshot> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("open dataset {} failed", path.display()))?;
    let records = read_records(file)
        .with_context(|| format!("read dataset {} failed", path.display()))?;

    tracing::info!(
        source = %path.display(),
        records_len = records.len(),
        "loaded dataset snapshot"
    );

    Ok(DatasetSnapshot {
        loaded_at: Utc::now(),
        source: path.display().to_string(),
        records,
    })
}

/// Parses the raw screener CSV. Columns are located by header name, so their
/// order does not matter. Unparseable numeric cells coerce to NaN rather than
/// failing the load; a missing column or an empty ticker is an error.
pub fn read_records<R: Read>(reader: R) -> anyhow::Result<Vec<StockRecord>> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv.headers().context("read CSV header failed")?.clone();
    let ticker_idx = column_index(&headers, TICKER_COL)?;
    let peg_idx = column_index(&headers, PEG_COL)?;
    let ptb_idx = column_index(&headers, PTB_COL)?;
    let pe_idx = column_index(&headers, PE_COL)?;
    let roe_idx = column_index(&headers, ROE_COL)?;
    let divy_idx = column_index(&headers, DIVY_COL)?;
    let dpr_idx = column_index(&headers, DPR_COL)?;

    let mut out = Vec::new();
    for (i, row) in csv.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.with_context(|| format!("read CSV row at line {line} failed"))?;

        let ticker = row.get(ticker_idx).unwrap_or("").trim();
        anyhow::ensure!(!ticker.is_empty(), "empty {TICKER_COL} at line {line}");

        out.push(StockRecord {
            ticker: ticker.to_string(),
            peg_ratio: parse_ratio(&row, peg_idx, PEG_COL, ticker),
            price_to_book: parse_ratio(&row, ptb_idx, PTB_COL, ticker),
            price_to_earnings: parse_ratio(&row, pe_idx, PE_COL, ticker),
            return_on_equity: parse_ratio(&row, roe_idx, ROE_COL, ticker),
            dividend_yield: parse_percent(&row, divy_idx, DIVY_COL, ticker),
            dividend_payout_ratio: parse_ratio(&row, dpr_idx, DPR_COL, ticker),
        });
    }

    Ok(out)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| format!("dataset is missing required column {name}"))
}

fn parse_ratio(row: &csv::StringRecord, idx: usize, column: &str, ticker: &str) -> f64 {
    coerce(row.get(idx).unwrap_or(""), column, ticker)
}

/// `DIVY` is stored upstream as a percentage string ("2.5%"); normalize to a
/// fraction.
fn parse_percent(row: &csv::StringRecord, idx: usize, column: &str, ticker: &str) -> f64 {
    let cell = row.get(idx).unwrap_or("").trim();
    let stripped = cell.strip_suffix('%').unwrap_or(cell);
    coerce(stripped, column, ticker) / 100.0
}

fn coerce(cell: &str, column: &str, ticker: &str) -> f64 {
    let cell = cell.trim();
    match cell.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            if !cell.is_empty() {
                tracing::debug!(ticker, column, cell, "coerced unparseable cell to NaN");
            }
            f64::NAN
        }
    }
}
