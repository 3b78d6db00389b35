use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::mods::dtos::{
    CreateModDto, ModQueryParams, ModResponseDto, ModTreeDto, UpdateModDto,
};
use crate::features::mods::services::ModService;
use crate::shared::types::{ApiResponse, Meta};

/// List catalog mods
///
/// Flat list by default, optionally filtered by category or to root mods.
/// With `tree=true` the whole catalog is returned nested, sorted by name.
#[utoipa::path(
    get,
    path = "/api/mods",
    params(ModQueryParams),
    responses(
        (status = 200, description = "Mods (flat list or tree)", body = ApiResponse<Vec<ModResponseDto>>),
        (status = 409, description = "Catalog contains a parent cycle")
    ),
    tag = "mods"
)]
pub async fn list_mods(
    State(service): State<Arc<ModService>>,
    Query(params): Query<ModQueryParams>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let (value, meta) = if params.tree {
        let tree: Vec<ModTreeDto> = service.tree().await?.into_iter().map(Into::into).collect();
        let meta = Meta::total_of(&tree);
        (serde_json::to_value(tree), meta)
    } else {
        let mods: Vec<ModResponseDto> = service
            .list(&params)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let meta = Meta::total_of(&mods);
        (serde_json::to_value(mods), meta)
    };

    let value = value.map_err(|e| AppError::Internal(format!("Failed to encode mods: {}", e)))?;
    Ok(Json(ApiResponse::success(Some(value), None, Some(meta))))
}

/// Get a mod by id
#[utoipa::path(
    get,
    path = "/api/mods/{id}",
    params(
        ("id" = String, Path, description = "Mod id")
    ),
    responses(
        (status = 200, description = "Mod found", body = ApiResponse<ModResponseDto>),
        (status = 404, description = "Mod not found")
    ),
    tag = "mods"
)]
pub async fn get_mod(
    State(service): State<Arc<ModService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ModResponseDto>>> {
    let found = service
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Mod '{}' not found", id)))?;

    Ok(Json(ApiResponse::success(Some(found.into()), None, None)))
}

/// List the direct children of a mod
#[utoipa::path(
    get,
    path = "/api/mods/{id}/children",
    params(
        ("id" = String, Path, description = "Parent mod id")
    ),
    responses(
        (status = 200, description = "Child mods", body = ApiResponse<Vec<ModResponseDto>>),
        (status = 404, description = "Parent mod not found")
    ),
    tag = "mods"
)]
pub async fn list_children(
    State(service): State<Arc<ModService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ModResponseDto>>>> {
    let children: Vec<ModResponseDto> = service
        .list_children(&id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total_of(&children);

    Ok(Json(ApiResponse::success(Some(children), None, Some(meta))))
}

/// Add a mod to the catalog
#[utoipa::path(
    post,
    path = "/api/mods",
    request_body = CreateModDto,
    responses(
        (status = 201, description = "Mod created", body = ApiResponse<ModResponseDto>),
        (status = 400, description = "Validation error or unknown parent")
    ),
    tag = "mods"
)]
pub async fn create_mod(
    State(service): State<Arc<ModService>>,
    AppJson(dto): AppJson<CreateModDto>,
) -> Result<(StatusCode, Json<ApiResponse<ModResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(created.into()),
            Some("Mod created".to_string()),
            None,
        )),
    ))
}

/// Update a mod
///
/// Nullable fields: omit to keep, send `null` to clear.
#[utoipa::path(
    patch,
    path = "/api/mods/{id}",
    params(
        ("id" = String, Path, description = "Mod id")
    ),
    request_body = UpdateModDto,
    responses(
        (status = 200, description = "Mod updated", body = ApiResponse<ModResponseDto>),
        (status = 400, description = "Validation error or unknown parent"),
        (status = 404, description = "Mod not found"),
        (status = 409, description = "New parent would create a cycle")
    ),
    tag = "mods"
)]
pub async fn update_mod(
    State(service): State<Arc<ModService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateModDto>,
) -> Result<Json<ApiResponse<ModResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = service.update(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(updated.into()),
        Some("Mod updated".to_string()),
        None,
    )))
}

/// Delete a mod without children
#[utoipa::path(
    delete,
    path = "/api/mods/{id}",
    params(
        ("id" = String, Path, description = "Mod id")
    ),
    responses(
        (status = 200, description = "Mod deleted"),
        (status = 404, description = "Mod not found"),
        (status = 409, description = "Mod still has children")
    ),
    tag = "mods"
)]
pub async fn delete_mod(
    State(service): State<Arc<ModService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Mod deleted".to_string()),
        None,
    )))
}
