use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use portfolio_core::StoreError;
use portfolio_store::POPULAR_ASSETS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ApiResponse, AppError, AppState};

#[derive(Serialize)]
pub struct SessionView {
    pub picks: Vec<String>,
    pub pick_weights: HashMap<String, f64>,
    pub current_portfolio: Option<String>,
    pub font_size: u32,
    pub news_page: u32,
    pub popular_assets: Vec<String>,
}

#[derive(Deserialize)]
pub struct AddPickRequest {
    pub symbol: String,
}

#[derive(Deserialize)]
pub struct CreateFromPicksRequest {
    pub name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(session_view))
        .route("/api/session/font/increase", post(increase_font))
        .route("/api/session/font/decrease", post(decrease_font))
        .route("/api/picks", post(add_pick))
        .route("/api/picks/:symbol", delete(remove_pick))
        .route("/api/picks/weights", put(set_pick_weights))
        .route("/api/picks/create", post(create_from_picks))
}

async fn session_view(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let session = state.session.read().await;
    Ok(Json(ApiResponse::success(SessionView {
        picks: session.picks.clone(),
        pick_weights: session.pick_weights.clone(),
        current_portfolio: session.store.current_name().map(String::from),
        font_size: session.font_size,
        news_page: session.news_page,
        popular_assets: POPULAR_ASSETS.iter().map(|s| s.to_string()).collect(),
    })))
}

/// Add a symbol to the pick list. The symbol is looked up with the
/// market-data provider first: an unknown symbol is a warned no-op, like
/// the original search-and-add flow.
async fn add_pick(
    State(state): State<AppState>,
    Json(request): Json<AddPickRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let symbol = match state.market.info(&request.symbol).await {
        Ok(info) => info.symbol.unwrap_or(request.symbol),
        Err(e) => {
            tracing::warn!("Asset not found: {} ({})", request.symbol, e);
            return Err(AppError::BadRequest(format!(
                "Asset not found: {}",
                request.symbol
            )));
        }
    };

    let mut session = state.session.write().await;
    session.add_pick(&symbol)?;
    Ok(Json(ApiResponse::success(session.picks.clone())))
}

async fn remove_pick(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let mut session = state.session.write().await;
    session.remove_pick(&symbol);
    Ok(Json(ApiResponse::success(session.picks.clone())))
}

async fn set_pick_weights(
    State(state): State<AppState>,
    Json(weights): Json<HashMap<String, f64>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if let Some((symbol, weight)) = weights
        .iter()
        .find(|(_, w)| **w <= 0.0 || **w > 100.0)
    {
        tracing::warn!("Out-of-range weight {} for {}", weight, symbol);
        return Err(AppError::Store(StoreError::InvalidWeight(*weight)));
    }
    let mut session = state.session.write().await;
    session.set_pick_weights(weights);
    Ok(Json(ApiResponse::success(())))
}

async fn create_from_picks(
    State(state): State<AppState>,
    Json(request): Json<CreateFromPicksRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut session = state.session.write().await;
    session.create_from_picks(&request.name)?;
    Ok(Json(ApiResponse::success(())))
}

async fn increase_font(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<u32>>, AppError> {
    let mut session = state.session.write().await;
    session.increase_font();
    Ok(Json(ApiResponse::success(session.font_size)))
}

async fn decrease_font(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<u32>>, AppError> {
    let mut session = state.session.write().await;
    session.decrease_font();
    Ok(Json(ApiResponse::success(session.font_size)))
}
