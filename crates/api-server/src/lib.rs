//! Thin JSON API over the portfolio core. Every handler is a named
//! session/store/client operation; the server holds no logic of its own.

pub mod news_routes;
pub mod portfolio_routes;
pub mod session_routes;
pub mod symbol_routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use market_client::{MarketClient, RiskFetcher};
use news_client::{NewsAggregator, NewsClient};
use portfolio_core::{MetricDefaults, StoreError};
use portfolio_store::Session;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Environment-driven server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub news_api_key: String,
    pub news_base_url: Option<String>,
    pub market_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("FOLIO_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            news_api_key: std::env::var("WORLD_NEWS_API_KEY").unwrap_or_default(),
            news_base_url: std::env::var("FOLIO_NEWS_BASE_URL").ok(),
            market_base_url: std::env::var("FOLIO_MARKET_BASE_URL").ok(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub market: Arc<MarketClient>,
    pub risk: Arc<RiskFetcher>,
    pub news: Arc<NewsAggregator>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let market = match &config.market_base_url {
            Some(base) => MarketClient::with_base_url(base.clone()),
            None => MarketClient::new(),
        };
        let news_client = match &config.news_base_url {
            Some(base) => NewsClient::with_base_url(config.news_api_key.clone(), base.clone()),
            None => NewsClient::new(config.news_api_key.clone()),
        };

        Self {
            session: Arc::new(RwLock::new(Session::new())),
            market: Arc::new(market.clone()),
            risk: Arc::new(RiskFetcher::new(market, MetricDefaults::default())),
            news: Arc::new(NewsAggregator::new(news_client)),
        }
    }
}

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error: store validation failures map to client errors, anything
/// else is a 500. Provider degradation never reaches this type — the
/// clients resolve it to defaults/demo data first.
#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Store(StoreError::NotFound(name)) => (
                StatusCode::NOT_FOUND,
                format!("Portfolio not found: {name}"),
            ),
            AppError::Store(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(portfolio_routes::routes())
        .merge(news_routes::routes())
        .merge(symbol_routes::routes())
        .merge(session_routes::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    let config = Config::from_env();
    let state = AppState::new(&config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
