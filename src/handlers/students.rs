//! Student handlers: list, enriched list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{NewStudent, StudentPatch};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.list_students().await?))
}

pub async fn list_enriched(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.list_students_enriched().await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.gateway.get_student(&student_id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(student))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let student = state
        .gateway
        .create_student(body)
        .await
        .map_err(AppError::conflict("Aadhar number exists"))?;
    tracing::info!(id = %student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    JsonBody(patch): JsonBody<StudentPatch>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.update_student(&student_id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.gateway.delete_student(&student_id).await?;
    tracing::info!(id = %student_id, "student deleted");
    Ok((StatusCode::OK, "Deleted"))
}
