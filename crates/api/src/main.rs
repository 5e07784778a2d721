use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screener_core::dataset::DatasetSnapshot;
use screener_core::domain::profile::InvestorProfile;
use screener_core::domain::stock::ScoredStock;
use screener_core::report::ScoreBand;
use screener_core::screen::{self, FilterCriteria};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = screener_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let dataset: Option<Arc<DatasetSnapshot>> = match settings.require_dataset_path() {
        Ok(path) => match screener_core::dataset::load_csv(path) {
            Ok(snapshot) => Some(Arc::new(snapshot)),
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "dataset load failed; starting API in degraded mode");
                None
            }
        },
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "SCREENER_DATASET missing; starting API in degraded mode");
            None
        }
    };

    let state = AppState { dataset };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/dataset", get(get_dataset_info))
        .route("/screen", post(post_screen))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    dataset: Option<Arc<DatasetSnapshot>>,
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
    loaded_at: DateTime<Utc>,
    source: String,
    records: usize,
}

async fn get_dataset_info(State(state): State<AppState>) -> Result<Json<DatasetInfo>, StatusCode> {
    let Some(dataset) = &state.dataset else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    Ok(Json(DatasetInfo {
        loaded_at: dataset.loaded_at,
        source: dataset.source.clone(),
        records: dataset.records.len(),
    }))
}

#[derive(Debug, Deserialize)]
struct ScreenRequest {
    /// Omitted criteria fields fall back to the permissive bounds.
    #[serde(default)]
    criteria: FilterCriteria,
    profile: InvestorProfile,
}

#[derive(Debug, Serialize)]
struct ScreenResponse {
    generated_at: DateTime<Utc>,
    profile: InvestorProfile,
    matched: usize,
    items: Vec<RankedItem>,
}

#[derive(Debug, Serialize)]
struct RankedItem {
    rank: i32,
    ticker: String,
    peg_ratio: f64,
    price_to_book: f64,
    price_to_earnings: f64,
    return_on_equity: f64,
    dividend_yield: f64,
    dividend_payout_ratio: f64,
    score: f64,
    band: Option<ScoreBand>,
}

impl RankedItem {
    fn from_scored(rank: i32, scored: ScoredStock) -> Self {
        let band = ScoreBand::classify(scored.score);
        let r = scored.record;
        Self {
            rank,
            ticker: r.ticker,
            peg_ratio: r.peg_ratio,
            price_to_book: r.price_to_book,
            price_to_earnings: r.price_to_earnings,
            return_on_equity: r.return_on_equity,
            dividend_yield: r.dividend_yield,
            dividend_payout_ratio: r.dividend_payout_ratio,
            score: scored.score,
            band,
        }
    }
}

async fn post_screen(
    State(state): State<AppState>,
    Json(req): Json<ScreenRequest>,
) -> Result<Json<ScreenResponse>, StatusCode> {
    let Some(dataset) = &state.dataset else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let matched = screen::filter(&dataset.records, &req.criteria);
    let ranked = screen::score(&matched, req.profile);

    tracing::info!(
        profile = %req.profile,
        matched = ranked.len(),
        total = dataset.records.len(),
        "screen request served"
    );

    let items = ranked
        .into_iter()
        .enumerate()
        .map(|(i, scored)| RankedItem::from_scored(i as i32 + 1, scored))
        .collect();

    Ok(Json(ScreenResponse {
        generated_at: Utc::now(),
        profile: req.profile,
        matched: matched.len(),
        items,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &screener_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_request_defaults_criteria_when_omitted() {
        let req: ScreenRequest = serde_json::from_str(r#"{"profile":"value"}"#).unwrap();
        assert_eq!(req.profile, InvestorProfile::Value);
        assert_eq!(req.criteria.peg_min, 0.0);
        assert_eq!(req.criteria.dpr_max, screen::NO_MAX);
    }

    #[test]
    fn screen_request_accepts_partial_criteria() {
        let req: ScreenRequest = serde_json::from_str(
            r#"{"criteria":{"pe_max":20.0,"dy_min":0.02},"profile":"income"}"#,
        )
        .unwrap();
        assert_eq!(req.criteria.pe_max, 20.0);
        assert_eq!(req.criteria.dy_min, 0.02);
        assert_eq!(req.criteria.peg_max, screen::NO_MAX);
    }

    #[test]
    fn screen_request_rejects_unknown_profiles() {
        let err = serde_json::from_str::<ScreenRequest>(r#"{"profile":"momentum"}"#).unwrap_err();
        assert!(err.to_string().contains("momentum"));
    }
}
