use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::cars::handlers;
use crate::features::cars::services::CarService;

/// Create routes for the garage
pub fn routes(service: Arc<CarService>) -> Router {
    Router::new()
        .route(
            "/api/cars",
            get(handlers::list_cars).post(handlers::create_car),
        )
        .route(
            "/api/cars/{car_id}",
            get(handlers::get_car)
                .patch(handlers::update_car)
                .delete(handlers::delete_car),
        )
        .with_state(service)
}
