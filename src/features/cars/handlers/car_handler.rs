use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::cars::dtos::{CarQueryParams, CarResponseDto, CreateCarDto, UpdateCarDto};
use crate::features::cars::services::CarService;
use crate::shared::types::{ApiResponse, Meta};

/// List a user's cars, newest first
#[utoipa::path(
    get,
    path = "/api/cars",
    params(CarQueryParams),
    responses(
        (status = 200, description = "Cars in the user's garage", body = ApiResponse<Vec<CarResponseDto>>),
        (status = 400, description = "Missing user_id")
    ),
    tag = "cars"
)]
pub async fn list_cars(
    State(service): State<Arc<CarService>>,
    Query(params): Query<CarQueryParams>,
) -> Result<Json<ApiResponse<Vec<CarResponseDto>>>> {
    let cars: Vec<CarResponseDto> = service
        .list_by_user(&params.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total_of(&cars);

    Ok(Json(ApiResponse::success(Some(cars), None, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/cars/{car_id}",
    params(
        ("car_id" = String, Path, description = "Car id")
    ),
    responses(
        (status = 200, description = "Car found", body = ApiResponse<CarResponseDto>),
        (status = 404, description = "Car not found")
    ),
    tag = "cars"
)]
pub async fn get_car(
    State(service): State<Arc<CarService>>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<CarResponseDto>>> {
    let car = service
        .get(&car_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car '{}' not found", car_id)))?;

    Ok(Json(ApiResponse::success(Some(car.into()), None, None)))
}

/// Add a car to a garage
#[utoipa::path(
    post,
    path = "/api/cars",
    request_body = CreateCarDto,
    responses(
        (status = 201, description = "Car created", body = ApiResponse<CarResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "cars"
)]
pub async fn create_car(
    State(service): State<Arc<CarService>>,
    AppJson(dto): AppJson<CreateCarDto>,
) -> Result<(StatusCode, Json<ApiResponse<CarResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let car = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(car.into()),
            Some("Car added to garage".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/cars/{car_id}",
    params(
        ("car_id" = String, Path, description = "Car id")
    ),
    request_body = UpdateCarDto,
    responses(
        (status = 200, description = "Car updated", body = ApiResponse<CarResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Car not found")
    ),
    tag = "cars"
)]
pub async fn update_car(
    State(service): State<Arc<CarService>>,
    Path(car_id): Path<String>,
    AppJson(dto): AppJson<UpdateCarDto>,
) -> Result<Json<ApiResponse<CarResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let car = service.update(&car_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(car.into()),
        Some("Car updated".to_string()),
        None,
    )))
}

/// Remove a car and all of its mod progress
#[utoipa::path(
    delete,
    path = "/api/cars/{car_id}",
    params(
        ("car_id" = String, Path, description = "Car id")
    ),
    responses(
        (status = 200, description = "Car deleted"),
        (status = 404, description = "Car not found")
    ),
    tag = "cars"
)]
pub async fn delete_car(
    State(service): State<Arc<CarService>>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&car_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Car deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::TestContext;
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_list_and_delete_car() {
        let ctx = TestContext::new();
        let server = TestServer::new(ctx.router()).unwrap();

        let created = server
            .post("/api/cars")
            .json(&json!({
                "user_id": "user-1",
                "make": "Toyota",
                "model": "GR86",
                "color": "Track bRED",
                "year": 2023
            }))
            .await;
        created.assert_status(axum::http::StatusCode::CREATED);
        let car_id = created.json::<serde_json::Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let garage = server
            .get("/api/cars")
            .add_query_param("user_id", "user-1")
            .await;
        garage.assert_status_ok();
        assert_eq!(garage.json::<serde_json::Value>()["meta"]["total"], 1);

        server
            .delete(&format!("/api/cars/{}", car_id))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/cars/{}", car_id))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_create_car_with_bad_year_is_rejected() {
        let ctx = TestContext::new();
        let server = TestServer::new(ctx.router()).unwrap();

        server
            .post("/api/cars")
            .json(&json!({
                "user_id": "user-1",
                "make": "Benz",
                "model": "Patent-Motorwagen",
                "color": "Black",
                "year": 1885
            }))
            .await
            .assert_status_bad_request();
    }
}
