//! Admin API handlers
//!
//! All routes here require the admin role via the `AdminUser`
//! extractor.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::commission::{CommissionOverview, SetRateRequest};
use crate::disputes::{DisputeWithDeal, ResolveDisputeRequest};
use crate::error::ApiError;
use crate::ledger::LedgerSummary;
use crate::middleware::AdminUser;
use crate::models::{CommissionSetting, Dispute, IssuerProfile};
use crate::state::AppState;

/// Commission configuration overview
pub async fn get_commissions(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<CommissionOverview>, ApiError> {
    let overview = app_state.commission_service.overview().await?;
    Ok(Json(overview))
}

/// Set the global commission rate
pub async fn set_global_commission(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<SetRateRequest>,
) -> Result<Json<CommissionSetting>, ApiError> {
    request.validate()?;
    let setting = app_state
        .commission_service
        .set_global_rate(request.rate)
        .await?;
    Ok(Json(setting))
}

/// Upsert a per-blogger commission override
pub async fn set_blogger_commission(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(blogger_id): Path<Uuid>,
    Json(request): Json<SetRateRequest>,
) -> Result<Json<CommissionSetting>, ApiError> {
    request.validate()?;
    let setting = app_state
        .commission_service
        .set_blogger_rate(blogger_id, request.rate)
        .await?;
    Ok(Json(setting))
}

/// Remove a per-blogger override, reverting to the global rate
pub async fn reset_blogger_commission(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(blogger_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .commission_service
        .reset_blogger_rate(blogger_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Disputes awaiting resolution, oldest first
pub async fn list_open_disputes(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<DisputeWithDeal>>, ApiError> {
    let disputes = app_state.dispute_service.open_disputes().await?;
    Ok(Json(disputes))
}

/// Resolve a dispute with an explicit outcome
pub async fn resolve_dispute(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveDisputeRequest>,
) -> Result<Json<Dispute>, ApiError> {
    request.validate()?;
    let dispute = app_state.dispute_service.resolve(id, request).await?;
    Ok(Json(dispute))
}

/// Settled ledger totals per movement type
pub async fn ledger_summary(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<LedgerSummary>, ApiError> {
    let summary = app_state.ledger_service.summary().await?;
    Ok(Json(summary))
}

/// Issuers awaiting verification
pub async fn pending_issuers(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<IssuerProfile>>, ApiError> {
    let issuers = app_state.profile_service.pending_issuers().await?;
    Ok(Json(issuers))
}

/// Mark an issuer as verified
pub async fn verify_issuer(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<IssuerProfile>, ApiError> {
    let issuer = app_state.profile_service.verify_issuer(id).await?;
    Ok(Json(issuer))
}
