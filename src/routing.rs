//! Application router configuration.

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    frontend::frontend_service,
    health::get_health,
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::create_transaction_endpoint,
};

/// Return a router with all the app's routes.
///
/// If `frontend_dir` is set, paths that do not match an API route are served from that
/// directory (see [resolve_frontend_dir](crate::resolve_frontend_dir)). Otherwise they get a
/// JSON 404 response.
pub fn build_router(state: AppState, frontend_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state);

    match frontend_dir {
        Some(dir) => api_routes.fallback_service(frontend_service(dir)),
        None => api_routes.fallback(get_404_not_found),
    }
}
