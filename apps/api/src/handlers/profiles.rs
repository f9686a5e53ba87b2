use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::{CreateProfileRequest, ProfileResponse, RenameProfileRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_profiles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProfileResponse>>> {
    let profiles = state
        .profile_service
        .list_profiles()
        .await?
        .into_iter()
        .map(ProfileResponse::from)
        .collect();

    Ok(Json(profiles))
}

pub async fn create_profile_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    let profile = state
        .profile_service
        .create_profile(payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

pub async fn rename_profile_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(payload): Json<RenameProfileRequest>,
) -> ApiResult<StatusCode> {
    state
        .profile_service
        .rename_profile(profile_id.as_str(), payload.name.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_profile_handler(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .profile_service
        .delete_profile(profile_id.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
