//! HTTP routes

pub mod health;
pub mod hello;

use axum::{Router, routing::get};
use axum_helpers::server::{create_router, health_router};

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Every route plus docs, middleware and fallbacks
pub fn app(state: &AppState) -> Router {
    let routes = Router::new()
        .route("/", get(hello::hello))
        .merge(health::router(state.clone()))
        .merge(health_router(state.config.app));

    create_router::<ApiDoc>(routes)
}
