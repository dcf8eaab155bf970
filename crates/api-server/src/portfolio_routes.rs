use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use portfolio_core::{classify, Holding, Portfolio, Quote, RiskMetrics};
use portfolio_store::{
    by_asset_type, by_region, by_sector, import_csv, reconcile, risk_summary, RiskSummary,
    WeightCheck,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct HoldingRequest {
    pub symbol: String,
    pub weight: f64,
}

#[derive(Deserialize)]
pub struct CreatePortfolioRequest {
    pub name: String,
    pub holdings: Vec<HoldingRequest>,
}

#[derive(Deserialize)]
pub struct SyncRequest {
    pub broker: String,
}

#[derive(Serialize)]
pub struct PortfolioListResponse {
    pub portfolios: Vec<Portfolio>,
    pub current: Option<String>,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub name: String,
    pub weight_check: WeightCheck,
    pub by_asset_type: HashMap<String, f64>,
    pub by_sector: HashMap<String, f64>,
    pub by_region: HashMap<String, f64>,
    pub metrics: HashMap<String, RiskMetrics>,
    pub risk: RiskSummary,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/portfolios", get(list_portfolios))
        .route("/api/portfolios", post(create_portfolio))
        .route("/api/portfolios/sync", post(sync_from_broker))
        .route("/api/portfolios/import", post(import_portfolio))
        .route("/api/portfolios/:name", delete(delete_portfolio))
        .route("/api/portfolios/:name/switch", post(switch_portfolio))
        .route("/api/portfolios/:name/holdings", post(add_holding))
        .route(
            "/api/portfolios/:name/holdings/:symbol",
            delete(remove_holding),
        )
        .route("/api/portfolios/:name/analysis", get(analyze_portfolio))
        .route("/api/portfolios/:name/monitor", get(monitor_portfolio))
}

async fn list_portfolios(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PortfolioListResponse>>, AppError> {
    let session = state.session.read().await;
    Ok(Json(ApiResponse::success(PortfolioListResponse {
        portfolios: session.store.portfolios().to_vec(),
        current: session.store.current_name().map(String::from),
    })))
}

async fn create_portfolio(
    State(state): State<AppState>,
    Json(request): Json<CreatePortfolioRequest>,
) -> Result<Json<ApiResponse<Portfolio>>, AppError> {
    let holdings: Vec<Holding> = request
        .holdings
        .into_iter()
        .map(|h| Holding {
            symbol: h.symbol,
            weight: h.weight,
        })
        .collect();

    let mut session = state.session.write().await;
    session.store.create(&request.name, holdings)?;
    let created = session
        .store
        .get(request.name.trim())
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("portfolio vanished after create"))?;
    Ok(Json(ApiResponse::success(created)))
}

async fn delete_portfolio(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut session = state.session.write().await;
    session.store.delete(&name)?;
    Ok(Json(ApiResponse::success(())))
}

async fn switch_portfolio(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut session = state.session.write().await;
    session.store.switch(&name)?;
    Ok(Json(ApiResponse::success(())))
}

async fn add_holding(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<HoldingRequest>,
) -> Result<Json<ApiResponse<Portfolio>>, AppError> {
    let mut session = state.session.write().await;
    session
        .store
        .add_holding(&name, &request.symbol, request.weight)?;
    let updated = session
        .store
        .get(&name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("portfolio vanished after update"))?;
    Ok(Json(ApiResponse::success(updated)))
}

async fn remove_holding(
    State(state): State<AppState>,
    Path((name, symbol)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut session = state.session.write().await;
    session.store.remove_holding(&name, &symbol)?;
    Ok(Json(ApiResponse::success(())))
}

async fn sync_from_broker(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<ApiResponse<Portfolio>>, AppError> {
    let mut session = state.session.write().await;
    let portfolio = session.store.sync_from_broker(&request.broker);
    Ok(Json(ApiResponse::success(portfolio)))
}

/// CSV body: first column symbol, optional second column weight.
async fn import_portfolio(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiResponse<Portfolio>>, AppError> {
    let portfolio = import_csv(body.as_bytes())?;
    let mut session = state.session.write().await;
    session.store.insert(portfolio.clone());
    Ok(Json(ApiResponse::success(portfolio)))
}

/// Full analysis view: reconciliation, allocation breakdowns, and the
/// weighted risk summary. One provider info lookup per symbol feeds both
/// the classifier and the risk resolver.
async fn analyze_portfolio(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<AnalysisResponse>>, AppError> {
    let portfolio = {
        let session = state.session.read().await;
        session
            .store
            .get(&name)
            .cloned()
            .ok_or_else(|| portfolio_core::StoreError::NotFound(name.clone()))?
    };

    let mut metrics: HashMap<String, RiskMetrics> = HashMap::new();
    let mut sectors: HashMap<String, String> = HashMap::new();
    for holding in &portfolio.holdings {
        let symbol = &holding.symbol;
        let info = match state.market.info(symbol).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Failed to get information for {}: {}", symbol, e);
                None
            }
        };
        let classification = classify(symbol, info.as_ref().and_then(|i| i.sector.as_deref()));
        sectors.insert(symbol.clone(), classification.sector);
        metrics.insert(symbol.clone(), state.risk.resolve(symbol, info.as_ref()));
    }

    let holdings = &portfolio.holdings;
    let response = AnalysisResponse {
        name: portfolio.name.clone(),
        weight_check: reconcile(holdings),
        by_asset_type: by_asset_type(holdings)
            .into_iter()
            .map(|(t, w)| (t.name().to_string(), w))
            .collect(),
        by_sector: by_sector(holdings, |s| {
            sectors.get(s).cloned().unwrap_or_else(|| "Other".to_string())
        }),
        by_region: by_region(holdings)
            .into_iter()
            .map(|(r, w)| (r.name().to_string(), w))
            .collect(),
        risk: risk_summary(holdings, &metrics),
        metrics,
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Latest price per holding. A symbol whose quote fails is reported with
/// no quote rather than failing the whole view.
async fn monitor_portfolio(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<(String, Option<Quote>)>>>, AppError> {
    let symbols = {
        let session = state.session.read().await;
        session
            .store
            .get(&name)
            .map(|p| p.symbols())
            .ok_or_else(|| portfolio_core::StoreError::NotFound(name.clone()))?
    };

    let mut quotes = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let quote = match state.market.quote(&symbol).await {
            Ok(q) => Some(q),
            Err(e) => {
                tracing::warn!("No price data for {}: {}", symbol, e);
                None
            }
        };
        quotes.push((symbol, quote));
    }

    Ok(Json(ApiResponse::success(quotes)))
}
