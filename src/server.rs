// KFO Studio - HTTP API
// Bookings, chat and the static landing page, served with Axum

use crate::catalog::{self, PricingTier, Service};
use crate::chat::ChatBackend;
use crate::store::{BookingError, BookingInput, BookingRecord, BookingStore};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub chat: Arc<dyn ChatBackend>,
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct CatalogResponse {
    services: Vec<Service>,
    pricing: Vec<PricingTier>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error response: status code plus `{"error": message}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        if err.is_validation() {
            ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
        } else {
            error!("booking store failure: {}", err);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "booking store unavailable")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        store: state.store.backend_name(),
        version: crate::VERSION,
    })
}

/// GET /api/services - Services and pricing
async fn get_services() -> impl IntoResponse {
    Json(CatalogResponse {
        services: catalog::services(),
        pricing: catalog::pricing(),
    })
}

/// GET /api/bookings - All bookings
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingRecord>>, ApiError> {
    let bookings = state.store.list_all()?;
    Ok(Json(bookings))
}

/// POST /api/bookings - Create a booking from the intake form
async fn create_booking(
    State(state): State<AppState>,
    Json(input): Json<BookingInput>,
) -> Result<(StatusCode, Json<BookingRecord>), ApiError> {
    let record = state.store.create(input)?;
    info!("booking #{} received ({})", record.id, record.project_type);
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/bookings/:id - One booking
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookingRecord>, ApiError> {
    state
        .store
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("booking {} not found", id)))
}

/// POST /api/chat - Ask the studio assistant
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "message is required"));
    }

    let reply = state.chat.send_message(message).await;
    Ok(Json(ChatReply { reply }))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/services", get(get_services))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/chat", post(chat))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
