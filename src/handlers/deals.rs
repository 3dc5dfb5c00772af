//! Deal API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::deals::{CreateDealRequest, OpenDisputeRequest, SubmitContentRequest};
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{Deal, Dispute, Transaction};
use crate::state::AppState;

/// Create a direct-offer deal (issuer)
pub async fn create_deal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateDealRequest>,
) -> Result<(StatusCode, Json<Deal>), ApiError> {
    request.validate()?;
    let deal = app_state
        .deal_service
        .create_deal(user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

/// Deals where the caller is a party, newest first
pub async fn my_deals(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Deal>>, ApiError> {
    let deals = app_state
        .deal_service
        .my_deals(user.user_id, user.role)
        .await?;
    Ok(Json(deals))
}

/// Single deal, party or admin only
pub async fn get_deal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, ApiError> {
    let deal = app_state
        .deal_service
        .deal_by_id(id, user.user_id, user.role)
        .await?;
    Ok(Json(deal))
}

/// Fund the deal's escrow (issuer)
pub async fn fund_escrow(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, ApiError> {
    let deal = app_state.deal_service.fund_escrow(id, user.user_id).await?;
    Ok(Json(deal))
}

/// Submit content for a funded deal (blogger)
pub async fn submit_content(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitContentRequest>,
) -> Result<Json<Deal>, ApiError> {
    request.validate()?;
    let deal = app_state
        .deal_service
        .submit_content(id, user.user_id, request)
        .await?;
    Ok(Json(deal))
}

/// Confirm submitted content and release the payout (issuer)
pub async fn confirm_deal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, ApiError> {
    let deal = app_state.deal_service.confirm_deal(id, user.user_id).await?;
    Ok(Json(deal))
}

/// Open a dispute on a deal (either party)
pub async fn open_dispute(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<OpenDisputeRequest>,
) -> Result<(StatusCode, Json<Dispute>), ApiError> {
    request.validate()?;
    let dispute = app_state
        .deal_service
        .open_dispute(id, user.user_id, user.role, request)
        .await?;
    Ok((StatusCode::CREATED, Json(dispute)))
}

/// The deal's dispute, party or admin only
pub async fn get_dispute(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Dispute>, ApiError> {
    let dispute = app_state
        .deal_service
        .dispute_for_deal(id, user.user_id, user.role)
        .await?;
    Ok(Json(dispute))
}

/// Ledger rows for a deal, party or admin only
pub async fn deal_transactions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = app_state
        .deal_service
        .deal_transactions(id, user.user_id, user.role)
        .await?;
    Ok(Json(transactions))
}
