use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::car_mods::dtos::{
    CarModResponseDto, MarkCompletedDto, ModStatusDto, ModStatusTreeDto, ModTreeQuery,
    UpdateCarModDto,
};
use crate::features::car_mods::services::CarModService;
use crate::shared::types::{ApiResponse, Meta};

/// List the raw ledger entries of a car
#[utoipa::path(
    get,
    path = "/api/cars/{car_id}/mods",
    params(
        ("car_id" = String, Path, description = "Car id")
    ),
    responses(
        (status = 200, description = "Ledger entries", body = ApiResponse<Vec<CarModResponseDto>>),
        (status = 404, description = "Car not found")
    ),
    tag = "car-mods"
)]
pub async fn list_entries(
    State(service): State<Arc<CarModService>>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CarModResponseDto>>>> {
    let entries: Vec<CarModResponseDto> = service
        .list_entries(&car_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total_of(&entries);

    Ok(Json(ApiResponse::success(Some(entries), None, Some(meta))))
}

/// Every catalog mod with this car's completion and unlock state
#[utoipa::path(
    get,
    path = "/api/cars/{car_id}/mods/status",
    params(
        ("car_id" = String, Path, description = "Car id")
    ),
    responses(
        (status = 200, description = "Mods with status, sorted by name", body = ApiResponse<Vec<ModStatusDto>>),
        (status = 404, description = "Car not found"),
        (status = 502, description = "Catalog or ledger unavailable")
    ),
    tag = "car-mods"
)]
pub async fn mods_with_status(
    State(service): State<Arc<CarModService>>,
    Path(car_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ModStatusDto>>>> {
    let statuses: Vec<ModStatusDto> = service
        .mods_with_status(&car_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total_of(&statuses);

    Ok(Json(ApiResponse::success(Some(statuses), None, Some(meta))))
}

/// Status tree of the catalog for a car
///
/// With `roots_only=true`, only root mods are returned, each with empty
/// children.
#[utoipa::path(
    get,
    path = "/api/cars/{car_id}/mods/tree",
    params(
        ("car_id" = String, Path, description = "Car id"),
        ModTreeQuery
    ),
    responses(
        (status = 200, description = "Status forest", body = ApiResponse<Vec<ModStatusTreeDto>>),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Catalog contains a parent cycle")
    ),
    tag = "car-mods"
)]
pub async fn mod_tree_with_status(
    State(service): State<Arc<CarModService>>,
    Path(car_id): Path<String>,
    Query(query): Query<ModTreeQuery>,
) -> Result<Json<ApiResponse<Vec<ModStatusTreeDto>>>> {
    let tree: Vec<ModStatusTreeDto> = service
        .mod_tree_with_status(&car_id, query.roots_only)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total_of(&tree);

    Ok(Json(ApiResponse::success(Some(tree), None, Some(meta))))
}

/// Ledger entry for one mod on a car
#[utoipa::path(
    get,
    path = "/api/cars/{car_id}/mods/{mod_id}",
    params(
        ("car_id" = String, Path, description = "Car id"),
        ("mod_id" = String, Path, description = "Mod id")
    ),
    responses(
        (status = 200, description = "Entry found", body = ApiResponse<CarModResponseDto>),
        (status = 404, description = "Car not found or mod never started on it")
    ),
    tag = "car-mods"
)]
pub async fn get_entry(
    State(service): State<Arc<CarModService>>,
    Path((car_id, mod_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CarModResponseDto>>> {
    let entry = service.get_entry(&car_id, &mod_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Mod '{}' has no entry on car '{}'",
            mod_id, car_id
        ))
    })?;

    Ok(Json(ApiResponse::success(Some(entry.into()), None, None)))
}

/// Mark a mod completed on a car
///
/// Creates the entry on first use. The body is optional; `notes` replaces
/// existing notes only when present.
#[utoipa::path(
    post,
    path = "/api/cars/{car_id}/mods/{mod_id}/complete",
    params(
        ("car_id" = String, Path, description = "Car id"),
        ("mod_id" = String, Path, description = "Mod id")
    ),
    request_body(content = MarkCompletedDto, description = "Optional; omit to keep existing notes"),
    responses(
        (status = 200, description = "Mod marked completed", body = ApiResponse<CarModResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Car or mod not found")
    ),
    tag = "car-mods"
)]
pub async fn mark_completed(
    State(service): State<Arc<CarModService>>,
    Path((car_id, mod_id)): Path<(String, String)>,
    body: Option<AppJson<MarkCompletedDto>>,
) -> Result<Json<ApiResponse<CarModResponseDto>>> {
    let dto = body.map(|AppJson(dto)| dto).unwrap_or_default();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let entry = service.mark_completed(&car_id, &mod_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(entry.into()),
        Some("Mod marked as completed".to_string()),
        None,
    )))
}

/// Clear the completion of a mod on a car
#[utoipa::path(
    post,
    path = "/api/cars/{car_id}/mods/{mod_id}/incomplete",
    params(
        ("car_id" = String, Path, description = "Car id"),
        ("mod_id" = String, Path, description = "Mod id")
    ),
    responses(
        (status = 200, description = "Mod marked incomplete", body = ApiResponse<CarModResponseDto>),
        (status = 404, description = "Car, mod or entry not found")
    ),
    tag = "car-mods"
)]
pub async fn mark_incomplete(
    State(service): State<Arc<CarModService>>,
    Path((car_id, mod_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CarModResponseDto>>> {
    let entry = service.mark_incomplete(&car_id, &mod_id).await?;
    Ok(Json(ApiResponse::success(
        Some(entry.into()),
        Some("Mod marked as incomplete".to_string()),
        None,
    )))
}

/// Edit a ledger entry
///
/// Each field: omit to keep, `null` to clear, value to set.
#[utoipa::path(
    patch,
    path = "/api/cars/{car_id}/mods/{mod_id}",
    params(
        ("car_id" = String, Path, description = "Car id"),
        ("mod_id" = String, Path, description = "Mod id")
    ),
    request_body = UpdateCarModDto,
    responses(
        (status = 200, description = "Entry updated", body = ApiResponse<CarModResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Car or entry not found")
    ),
    tag = "car-mods"
)]
pub async fn update_entry(
    State(service): State<Arc<CarModService>>,
    Path((car_id, mod_id)): Path<(String, String)>,
    AppJson(dto): AppJson<UpdateCarModDto>,
) -> Result<Json<ApiResponse<CarModResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let entry = service.update_entry(&car_id, &mod_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(entry.into()),
        Some("Car mod updated".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cars/{car_id}/mods/{mod_id}",
    params(
        ("car_id" = String, Path, description = "Car id"),
        ("mod_id" = String, Path, description = "Mod id")
    ),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 404, description = "Car or entry not found")
    ),
    tag = "car-mods"
)]
pub async fn delete_entry(
    State(service): State<Arc<CarModService>>,
    Path((car_id, mod_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_entry(&car_id, &mod_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Car mod deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::{create_mod_dto, TestContext};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_complete_then_read_status_and_tree() {
        let ctx = TestContext::new();
        let car = ctx.create_car("user-1").await;
        let engine = ctx
            .mod_service
            .create(create_mod_dto("Engine", None))
            .await
            .unwrap();
        let intake = ctx
            .mod_service
            .create(create_mod_dto("Cold Air Intake", Some(&engine.id)))
            .await
            .unwrap();
        let server = TestServer::new(ctx.router()).unwrap();

        let status = server
            .get(&format!("/api/cars/{}/mods/status", car.id))
            .await;
        status.assert_status_ok();
        let body = status.json::<Value>();
        assert_eq!(body["data"][0]["mod"]["id"], intake.id.as_str());
        assert_eq!(body["data"][0]["is_unlocked"], false);

        let completed = server
            .post(&format!("/api/cars/{}/mods/{}/complete", car.id, engine.id))
            .json(&json!({ "notes": "Baseline dyno run" }))
            .await;
        completed.assert_status_ok();
        let entry = completed.json::<Value>();
        assert_eq!(entry["data"]["notes"], "Baseline dyno run");
        assert_eq!(entry["data"]["completed_at"], "2024-01-01T00:00:00Z");

        let tree = server
            .get(&format!("/api/cars/{}/mods/tree", car.id))
            .await
            .json::<Value>();
        assert_eq!(tree["data"][0]["mod"]["id"], engine.id.as_str());
        assert_eq!(tree["data"][0]["is_completed"], true);
        assert_eq!(tree["data"][0]["children"][0]["is_unlocked"], true);

        let roots = server
            .get(&format!("/api/cars/{}/mods/tree", car.id))
            .add_query_param("roots_only", true)
            .await
            .json::<Value>();
        assert_eq!(roots["meta"]["total"], 1);
        assert_eq!(roots["data"][0]["children"], json!([]));
    }

    #[tokio::test]
    async fn test_complete_without_body_keeps_notes() {
        let ctx = TestContext::new();
        let car = ctx.create_car("user-1").await;
        let engine = ctx
            .mod_service
            .create(create_mod_dto("Engine", None))
            .await
            .unwrap();
        let server = TestServer::new(ctx.router()).unwrap();
        let path = format!("/api/cars/{}/mods/{}/complete", car.id, engine.id);

        let first = server.post(&path).await;
        first.assert_status_ok();
        let entry = first.json::<Value>();
        assert_eq!(entry["data"]["completed_at"], "2024-01-01T00:00:00Z");
        assert!(entry["data"]["notes"].is_null());

        server
            .post(&path)
            .json(&json!({ "notes": "Stock block" }))
            .await
            .assert_status_ok();

        let again = server.post(&path).await;
        again.assert_status_ok();
        assert_eq!(again.json::<Value>()["data"]["notes"], "Stock block");
    }

    #[tokio::test]
    async fn test_patch_entry_and_incomplete_errors() {
        let ctx = TestContext::new();
        let car = ctx.create_car("user-1").await;
        let engine = ctx
            .mod_service
            .create(create_mod_dto("Engine", None))
            .await
            .unwrap();
        let server = TestServer::new(ctx.router()).unwrap();
        let entry_path = format!("/api/cars/{}/mods/{}", car.id, engine.id);

        server
            .post(&format!("{}/incomplete", entry_path))
            .await
            .assert_status_not_found();
        server.get(&entry_path).await.assert_status_not_found();

        server
            .post(&format!("{}/complete", entry_path))
            .json(&json!({}))
            .await
            .assert_status_ok();

        let patched = server
            .patch(&entry_path)
            .json(&json!({ "completed_at": null, "notes": "Waiting on parts" }))
            .await;
        patched.assert_status_ok();
        let body = patched.json::<Value>();
        assert!(body["data"]["completed_at"].is_null());
        assert_eq!(body["data"]["notes"], "Waiting on parts");

        server.delete(&entry_path).await.assert_status_ok();
        server.delete(&entry_path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_unknown_car_is_404() {
        let ctx = TestContext::new();
        let server = TestServer::new(ctx.router()).unwrap();

        let response = server.get("/api/cars/ghost/mods/status").await;
        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["success"], false);
    }
}
