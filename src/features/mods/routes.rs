use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::mods::handlers;
use crate::features::mods::services::ModService;

/// Create routes for the mod catalog
pub fn routes(service: Arc<ModService>) -> Router {
    Router::new()
        .route(
            "/api/mods",
            get(handlers::list_mods).post(handlers::create_mod),
        )
        .route(
            "/api/mods/{id}",
            get(handlers::get_mod)
                .patch(handlers::update_mod)
                .delete(handlers::delete_mod),
        )
        .route("/api/mods/{id}/children", get(handlers::list_children))
        .with_state(service)
}
