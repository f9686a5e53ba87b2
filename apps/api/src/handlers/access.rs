use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::{error, info};

use examina_core::AppError;

use crate::dto::{
    AccessTreeNodeResponse, MenuResponse, NavigationMenuResponse, UpdateAccessRequest,
    UpdateAccessResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Query parameters naming the profile to resolve.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "profileId")]
    pub profile_id: String,
}

pub async fn list_menus_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MenuResponse>>> {
    let menus = state
        .access_service
        .list_menus()
        .await?
        .into_iter()
        .map(MenuResponse::from)
        .collect();

    Ok(Json(menus))
}

pub async fn access_tree_handler(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<Vec<AccessTreeNodeResponse>>> {
    let tree = state
        .access_service
        .access_tree(query.profile_id.as_str())
        .await?
        .into_iter()
        .map(AccessTreeNodeResponse::from)
        .collect();

    Ok(Json(tree))
}

pub async fn navigation_handler(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<Vec<NavigationMenuResponse>>> {
    let menus = state
        .access_service
        .navigation(query.profile_id.as_str())
        .await?
        .into_iter()
        .map(NavigationMenuResponse::from)
        .collect();

    Ok(Json(menus))
}

/// Applies a submitted access map to one profile's overrides.
///
/// The endpoint always answers 200 with an `{ok, message?}` body: the access
/// editor treats a failed save as a form-level notice, not a transport
/// error. Entries the merge skipped do not fail the call and are not
/// reported individually.
pub async fn update_access_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateAccessRequest>,
) -> Json<UpdateAccessResponse> {
    match state
        .access_service
        .update_access(payload.profile_id.as_str(), &payload.accesos)
        .await
    {
        Ok(stats) => {
            info!(
                profile_id = payload.profile_id.as_str(),
                inserted = stats.inserted,
                updated = stats.updated,
                skipped = stats.skipped,
                "profile accesses updated"
            );
            Json(UpdateAccessResponse {
                ok: true,
                message: None,
            })
        }
        Err(AppError::Forbidden(message)) => Json(UpdateAccessResponse {
            ok: false,
            message: Some(message),
        }),
        Err(error) => {
            error!(
                profile_id = payload.profile_id.as_str(),
                %error,
                "failed to update profile accesses"
            );
            Json(UpdateAccessResponse {
                ok: false,
                message: Some("failed to save access changes".to_owned()),
            })
        }
    }
}
