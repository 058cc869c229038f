//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for research, web search, and scraping.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::GranskeError;
use crate::pipeline::ResearchPipeline;
use crate::search::{SearchHit, SearchProvider, TavilySearch};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    pipeline: ResearchPipeline,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let pipeline = ResearchPipeline::new(settings)?;

    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/research", post(research))
        .route("/search", post(search))
        .route("/scrape", post(scrape))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Granske API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Research", "POST /research");
    Output::kv("Search", "POST /search");
    Output::kv("Scrape", "POST /scrape");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ResearchRequest {
    /// Research instruction or question
    #[serde(default)]
    instruction: Option<String>,
    /// Accepted in place of 'instruction'
    #[serde(default)]
    question: Option<String>,
    /// Number of search queries to generate
    #[serde(default)]
    num_queries: Option<usize>,
}

#[derive(Deserialize)]
struct SearchRequest {
    /// Search queries; a single 'query' string is accepted in its place
    #[serde(default)]
    queries: Option<Vec<String>>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
    total: usize,
}

#[derive(Deserialize)]
struct ScrapeRequest {
    url: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn research(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResearchRequest>,
) -> impl IntoResponse {
    let instruction = match req.instruction.as_deref().or(req.question.as_deref()) {
        Some(i) => i.to_string(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Missing 'instruction' field (or 'question')".to_string(),
                }),
            )
                .into_response()
        }
    };

    match state.pipeline.research(&instruction, req.num_queries).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            let status = match &e {
                GranskeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let queries = match (req.queries, req.query) {
        (Some(queries), _) if !queries.is_empty() => queries,
        (_, Some(query)) => vec![query],
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Missing 'queries' field (or 'query')".to_string(),
                }),
            )
                .into_response()
        }
    };

    // A custom limit needs its own provider; the shared one is configured
    // with the settings limit.
    let results = match req.limit {
        Some(limit) => {
            let mut search_settings = state.pipeline.settings().search.clone();
            search_settings.max_results = limit;
            TavilySearch::new(search_settings).search(&queries).await
        }
        None => state.pipeline.search_provider().search(&queries).await,
    };

    match results {
        Ok(results) => Json(SearchResponse {
            total: results.len(),
            results,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrapeRequest>,
) -> impl IntoResponse {
    match state.pipeline.page_scraper().scrape(&req.url).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
