//! Professor handlers, including proctorship listing and assignment.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{NewProfessor, ProctorAssignment, ProfessorPatch};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.list_professors().await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(professor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let professor = state
        .gateway
        .get_professor(&professor_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(professor))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewProfessor>,
) -> Result<impl IntoResponse, AppError> {
    let professor = state
        .gateway
        .create_professor(body)
        .await
        .map_err(AppError::conflict("Aadhar number exists"))?;
    tracing::info!(id = %professor.id, "professor created");
    Ok((StatusCode::CREATED, Json(professor)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(professor_id): Path<String>,
    JsonBody(patch): JsonBody<ProfessorPatch>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.update_professor(&professor_id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(professor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.gateway.delete_professor(&professor_id).await?;
    tracing::info!(id = %professor_id, "professor deleted");
    Ok((StatusCode::OK, "Deleted"))
}

pub async fn list_proctorships(
    State(state): State<AppState>,
    Path(professor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.gateway.list_students_by_proctor(&professor_id).await?))
}

pub async fn assign_proctor(
    State(state): State<AppState>,
    Path(professor_id): Path<String>,
    JsonBody(ProctorAssignment { student_id }): JsonBody<ProctorAssignment>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.gateway.assign_proctor(&professor_id, &student_id).await?;
    tracing::info!(professor = %professor_id, student = %student_id, "proctor assigned");
    Ok(Json(student))
}
