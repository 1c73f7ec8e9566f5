use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::application::{AppError, Registry};

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<Registry>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/pages",
            get(list_pages).post(add_page).delete(remove_page),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[derive(Deserialize)]
struct PageBody {
    url: String,
}

async fn list_pages(State(state): State<ApiState>) -> Response {
    match state.registry.list_urls() {
        Ok(urls) => Json(urls).into_response(),
        Err(e) => error_response(e),
    }
}

async fn add_page(State(state): State<ApiState>, Json(body): Json<PageBody>) -> Response {
    match state.registry.add_url(&body.url).await {
        Ok(url) => (StatusCode::CREATED, Json(url)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn remove_page(State(state): State<ApiState>, Json(body): Json<PageBody>) -> Response {
    match state.registry.remove_url(&body.url).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: AppError) -> Response {
    let code = match e {
        AppError::Config(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, format!("error: {e}")).into_response()
}
