use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::car_mods::handlers;
use crate::features::car_mods::services::CarModService;

/// Create routes for per-car mod progress
pub fn routes(service: Arc<CarModService>) -> Router {
    Router::new()
        .route("/api/cars/{car_id}/mods", get(handlers::list_entries))
        .route(
            "/api/cars/{car_id}/mods/status",
            get(handlers::mods_with_status),
        )
        .route(
            "/api/cars/{car_id}/mods/tree",
            get(handlers::mod_tree_with_status),
        )
        .route(
            "/api/cars/{car_id}/mods/{mod_id}",
            get(handlers::get_entry)
                .patch(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route(
            "/api/cars/{car_id}/mods/{mod_id}/complete",
            post(handlers::mark_completed),
        )
        .route(
            "/api/cars/{car_id}/mods/{mod_id}/incomplete",
            post(handlers::mark_incomplete),
        )
        .with_state(service)
}
