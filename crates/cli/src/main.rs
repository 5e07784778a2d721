use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screener_core::config::Settings;
use screener_core::domain::profile::InvestorProfile;
use screener_core::report::{self, ScoreBand};
use screener_core::screen::{self, FilterCriteria, NO_MAX};

#[derive(Debug, Parser)]
#[command(name = "screener_cli")]
struct Args {
    /// Path to the dataset CSV. Defaults to SCREENER_DATASET.
    #[arg(long)]
    data: Option<String>,

    /// Investor profile: value, growth or income.
    #[arg(long)]
    profile: InvestorProfile,

    /// PEG ratio lower bound (inclusive).
    #[arg(long, default_value_t = 0.0)]
    peg_min: f64,

    /// PEG ratio upper bound (inclusive).
    #[arg(long, default_value_t = NO_MAX)]
    peg_max: f64,

    /// Price-to-book lower bound (inclusive).
    #[arg(long, default_value_t = 0.0)]
    pb_min: f64,

    /// Price-to-book upper bound (inclusive).
    #[arg(long, default_value_t = NO_MAX)]
    pb_max: f64,

    /// Price-to-earnings lower bound (inclusive).
    #[arg(long, default_value_t = 0.0)]
    pe_min: f64,

    /// Price-to-earnings upper bound (inclusive).
    #[arg(long, default_value_t = NO_MAX)]
    pe_max: f64,

    /// Return-on-equity lower bound, caller-normalized scale.
    #[arg(long, default_value_t = 0.0)]
    roe_min: f64,

    /// Dividend yield lower bound as a fraction (0.04 for 4%).
    #[arg(long, default_value_t = 0.0)]
    dy_min: f64,

    /// Dividend payout ratio upper bound as a fraction.
    #[arg(long, default_value_t = NO_MAX)]
    dpr_max: f64,

    /// Cap the number of printed rows (export is never capped).
    #[arg(long)]
    limit: Option<usize>,

    /// Write the full ranked result set to this CSV path.
    #[arg(long)]
    export: Option<String>,
}

impl Args {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            peg_min: self.peg_min,
            peg_max: self.peg_max,
            pb_min: self.pb_min,
            pb_max: self.pb_max,
            pe_min: self.pe_min,
            pe_max: self.pe_max,
            roe_min: self.roe_min,
            dy_min: self.dy_min,
            dpr_max: self.dpr_max,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(&settings, &args) {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "screen run failed");
        return Err(err);
    }

    Ok(())
}

fn run(settings: &Settings, args: &Args) -> anyhow::Result<()> {
    let path = match args.data.as_deref() {
        Some(p) => p,
        None => settings
            .require_dataset_path()
            .context("pass --data or set SCREENER_DATASET")?,
    };

    let snapshot = screener_core::dataset::load_csv(path)?;
    tracing::info!(
        source = %snapshot.source,
        loaded_at = %snapshot.loaded_at,
        "screening dataset snapshot"
    );

    let matched = screen::filter(&snapshot.records, &args.criteria());
    println!(
        "Found {} of {} stocks meeting your criteria.",
        matched.len(),
        snapshot.records.len()
    );

    if matched.is_empty() {
        println!("No stocks meet the selected criteria. Adjust the thresholds and try again.");
        return Ok(());
    }

    let ranked = screen::score(&matched, args.profile);

    println!();
    println!("{:>4}  {:<10} {:>10}  BAND", "RANK", "TICKER", "SCORE");
    let shown = args.limit.unwrap_or(ranked.len());
    for (i, item) in ranked.iter().take(shown).enumerate() {
        let band = match ScoreBand::classify(item.score) {
            Some(b) => b.to_string(),
            None => "-".to_string(),
        };
        println!(
            "{:>4}  {:<10} {:>10.2}  {}",
            i + 1,
            item.record.ticker,
            item.score,
            band
        );
    }
    if shown < ranked.len() {
        println!("... {} more rows (raise --limit to see them)", ranked.len() - shown);
    }

    if let Some(export_path) = args.export.as_deref() {
        let file = std::fs::File::create(export_path)
            .with_context(|| format!("create export file {export_path} failed"))?;
        report::write_ranked_csv(file, &ranked)?;
        println!();
        println!("Wrote {} ranked rows to {export_path}.", ranked.len());
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
