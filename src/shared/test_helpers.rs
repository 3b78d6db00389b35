//! Shared fixtures for service and handler tests

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, TimeZone, Utc};

use crate::features::car_mods::{routes as car_mods_routes, CarModService};
use crate::features::cars::dtos::CreateCarDto;
use crate::features::cars::models::Car;
use crate::features::cars::{routes as cars_routes, CarService};
use crate::features::mods::dtos::CreateModDto;
use crate::features::mods::{routes as mods_routes, ModService};
use crate::modules::memory::MemoryStore;
use crate::shared::clock::ManualClock;

/// Services wired to one in-memory store and a clock frozen at `start`
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub start: DateTime<Utc>,
    pub mod_service: Arc<ModService>,
    pub car_service: Arc<CarService>,
    pub car_mod_service: Arc<CarModService>,
}

impl TestContext {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start));

        let mod_service = Arc::new(ModService::new(store.clone(), clock.clone()));
        let car_service = Arc::new(CarService::new(store.clone(), clock.clone()));
        let car_mod_service = Arc::new(CarModService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        ));

        Self {
            store,
            clock,
            start,
            mod_service,
            car_service,
            car_mod_service,
        }
    }

    pub async fn create_car(&self, user_id: &str) -> Car {
        self.car_service
            .create(create_car_dto(user_id))
            .await
            .unwrap()
    }

    /// API routes without the swagger and tracing layers
    pub fn router(&self) -> Router {
        Router::new()
            .merge(mods_routes::routes(self.mod_service.clone()))
            .merge(cars_routes::routes(self.car_service.clone()))
            .merge(car_mods_routes::routes(self.car_mod_service.clone()))
    }
}

pub fn create_mod_dto(name: &str, parent_mod_id: Option<&str>) -> CreateModDto {
    CreateModDto {
        name: name.to_string(),
        description: None,
        parent_mod_id: parent_mod_id.map(str::to_string),
        category: None,
        image_url: None,
    }
}

pub fn create_car_dto(user_id: &str) -> CreateCarDto {
    CreateCarDto {
        user_id: user_id.to_string(),
        make: "Honda".to_string(),
        model: "Civic Type R".to_string(),
        color: "Championship White".to_string(),
        year: 2017,
        image_url: None,
    }
}
