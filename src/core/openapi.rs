use utoipa::{Modify, OpenApi};

use crate::features::car_mods::{dtos as car_mods_dtos, handlers as car_mods_handlers};
use crate::features::cars::{dtos as cars_dtos, handlers as cars_handlers};
use crate::features::mods::{dtos as mods_dtos, handlers as mods_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Mod catalog
        mods_handlers::list_mods,
        mods_handlers::get_mod,
        mods_handlers::list_children,
        mods_handlers::create_mod,
        mods_handlers::update_mod,
        mods_handlers::delete_mod,
        // Garage
        cars_handlers::list_cars,
        cars_handlers::get_car,
        cars_handlers::create_car,
        cars_handlers::update_car,
        cars_handlers::delete_car,
        // Per-car mod progress
        car_mods_handlers::list_entries,
        car_mods_handlers::mods_with_status,
        car_mods_handlers::mod_tree_with_status,
        car_mods_handlers::get_entry,
        car_mods_handlers::mark_completed,
        car_mods_handlers::mark_incomplete,
        car_mods_handlers::update_entry,
        car_mods_handlers::delete_entry,
    ),
    components(
        schemas(
            Meta,
            // Mod catalog
            mods_dtos::ModResponseDto,
            mods_dtos::ModTreeDto,
            mods_dtos::CreateModDto,
            mods_dtos::UpdateModDto,
            ApiResponse<mods_dtos::ModResponseDto>,
            ApiResponse<Vec<mods_dtos::ModResponseDto>>,
            // Garage
            cars_dtos::CarResponseDto,
            cars_dtos::CreateCarDto,
            cars_dtos::UpdateCarDto,
            ApiResponse<cars_dtos::CarResponseDto>,
            ApiResponse<Vec<cars_dtos::CarResponseDto>>,
            // Per-car mod progress
            car_mods_dtos::CarModResponseDto,
            car_mods_dtos::ModStatusDto,
            car_mods_dtos::ModStatusTreeDto,
            car_mods_dtos::MarkCompletedDto,
            car_mods_dtos::UpdateCarModDto,
            ApiResponse<car_mods_dtos::CarModResponseDto>,
            ApiResponse<Vec<car_mods_dtos::CarModResponseDto>>,
            ApiResponse<Vec<car_mods_dtos::ModStatusDto>>,
            ApiResponse<Vec<car_mods_dtos::ModStatusTreeDto>>,
        )
    ),
    tags(
        (name = "mods", description = "Mod catalog and its prerequisite tree"),
        (name = "cars", description = "Cars in a user's garage"),
        (name = "car-mods", description = "Per-car mod completion and unlock status"),
    ),
    info(
        title = "ModMyCar API",
        version = "0.1.0",
        description = "Mod tracking and unlock progression for ModMyCar",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
