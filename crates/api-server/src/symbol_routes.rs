use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use market_client::{HistoryRange, Interval};
use portfolio_core::{classify, AssetClassification, Bar, RiskMetrics};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

#[derive(Serialize)]
pub struct SymbolProfile {
    pub symbol: String,
    pub short_name: Option<String>,
    pub classification: AssetClassification,
    pub metrics: RiskMetrics,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub range: Option<String>,
    pub interval: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/symbols/:symbol/profile", get(symbol_profile))
        .route("/api/symbols/:symbol/history", get(symbol_history))
}

/// Classification, risk metrics, and latest price for one symbol. A
/// provider failure degrades to fallback metrics; the price fields are
/// simply absent.
async fn symbol_profile(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<SymbolProfile>>, AppError> {
    let info = match state.market.info(&symbol).await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!("Failed to get information for {}: {}", symbol, e);
            None
        }
    };

    let classification = classify(&symbol, info.as_ref().and_then(|i| i.sector.as_deref()));
    let metrics = state.risk.resolve(&symbol, info.as_ref());

    let price = info.as_ref().and_then(|i| i.regular_market_price);
    let prev = info
        .as_ref()
        .and_then(|i| i.regular_market_previous_close);
    let change = match (price, prev) {
        (Some(p), Some(pc)) => Some(p - pc),
        _ => None,
    };
    let change_percent = match (change, prev) {
        (Some(c), Some(pc)) if pc != 0.0 => Some(c / pc * 100.0),
        _ => None,
    };

    Ok(Json(ApiResponse::success(SymbolProfile {
        symbol,
        short_name: info.and_then(|i| i.short_name),
        classification,
        metrics,
        price,
        change,
        change_percent,
    })))
}

async fn symbol_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Bar>>>, AppError> {
    let range = match query.range.as_deref() {
        None => HistoryRange::OneMonth,
        Some(raw) => HistoryRange::parse(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown range: {raw}")))?,
    };
    let interval = match query.interval.as_deref() {
        None => Interval::Daily,
        Some(raw) => Interval::parse(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown interval: {raw}")))?,
    };

    let bars = state
        .market
        .history(&symbol, range, interval)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Json(ApiResponse::success(bars)))
}
