use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use news_client::AssetFilter;
use portfolio_core::{NewsItem, NewsPage};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Deserialize)]
pub struct NewsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub keyword: Option<String>,
    /// "All Holdings" | "Stocks" | "ETFs" | "Cryptocurrencies"
    pub filter: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/news", get(search_news))
        .route("/api/news/selected", get(get_selected).post(select_news))
        .route("/api/news/page/next", post(next_page))
        .route("/api/news/page/prev", post(prev_page))
}

/// Search news for the active portfolio's symbols (or the demo list).
/// Each page turn is a fresh provider call; the session keeps the cursor.
async fn search_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<ApiResponse<NewsPage>>, AppError> {
    let (symbols, page) = {
        let mut session = state.session.write().await;
        if let Some(page) = query.page {
            session.news_page = page.max(1);
        }
        (session.news_symbols(), session.news_page)
    };

    let filter = query
        .filter
        .as_deref()
        .map(AssetFilter::parse)
        .unwrap_or_default();

    let result = state
        .news
        .search(
            &symbols,
            page,
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            query.keyword.as_deref(),
            filter,
        )
        .await;

    Ok(Json(ApiResponse::success(result)))
}

/// Focus a news item for the detail pane. Held by value: deleting or
/// refetching the list does not invalidate the selection.
async fn select_news(
    State(state): State<AppState>,
    Json(item): Json<NewsItem>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let mut session = state.session.write().await;
    session.selected_news = Some(item);
    Ok(Json(ApiResponse::success(())))
}

async fn get_selected(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<NewsItem>>>, AppError> {
    let session = state.session.read().await;
    Ok(Json(ApiResponse::success(session.selected_news.clone())))
}

async fn next_page(State(state): State<AppState>) -> Result<Json<ApiResponse<u32>>, AppError> {
    let mut session = state.session.write().await;
    session.next_news_page();
    Ok(Json(ApiResponse::success(session.news_page)))
}

async fn prev_page(State(state): State<AppState>) -> Result<Json<ApiResponse<u32>>, AppError> {
    let mut session = state.session.write().await;
    session.prev_news_page();
    Ok(Json(ApiResponse::success(session.news_page)))
}
