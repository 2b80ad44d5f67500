//! Library membership handlers, addressed by the owning student's id.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{LibraryMembershipPatch, NewLibraryMembership};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn read(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let membership = state
        .gateway
        .get_library_membership(&student_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(membership))
}

pub async fn create(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    JsonBody(body): JsonBody<NewLibraryMembership>,
) -> Result<impl IntoResponse, AppError> {
    let membership = state
        .gateway
        .create_library_membership(&student_id, body)
        .await
        .map_err(AppError::conflict("Membership exists"))?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    JsonBody(patch): JsonBody<LibraryMembershipPatch>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.update_library_membership(&student_id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.gateway.delete_library_membership(&student_id).await?;
    Ok((StatusCode::OK, "Deleted"))
}
