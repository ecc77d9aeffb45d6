use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use service::UserDirectory;

use crate::observability;

pub mod users;

/// Shared handler state: the single user store instance built at startup.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<dyn UserDirectory>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

async fn count_requests(req: Request, next: Next) -> Response {
    observability::REQUESTS_TOTAL.inc();
    next.run(req).await
}

/// Build the full application router: user CRUD under `/api`, plus health and metrics.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let api = Router::new()
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(count_requests));

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx 以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
