//! Campaign API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::campaigns::{
    ApplicationOutcome, ApplicationWithBlogger, ApplyCampaignRequest, CreateCampaignRequest,
    UpdateApplicationRequest,
};
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{Campaign, CampaignApplication};
use crate::state::AppState;

/// Create a campaign (verified issuer)
pub async fn create_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    request.validate()?;
    let campaign = app_state
        .campaign_service
        .create_campaign(user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Apply to a campaign (blogger)
pub async fn apply_to_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyCampaignRequest>,
) -> Result<(StatusCode, Json<CampaignApplication>), ApiError> {
    request.validate()?;
    let application = app_state
        .campaign_service
        .apply(user.user_id, id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// Applications to a campaign, owner only
pub async fn list_applications(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationWithBlogger>>, ApiError> {
    let applications = app_state
        .campaign_service
        .applications(user.user_id, id)
        .await?;
    Ok(Json(applications))
}

/// Accept or reject a pending application (owner). Acceptance returns
/// the spawned deal.
pub async fn update_application(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, app_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationOutcome>, ApiError> {
    let outcome = app_state
        .campaign_service
        .update_application(user.user_id, id, app_id, request)
        .await?;
    Ok(Json(outcome))
}
