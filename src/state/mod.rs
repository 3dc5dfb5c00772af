//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::campaigns::CampaignService;
use crate::commission::CommissionService;
use crate::deals::DealService;
use crate::disputes::DisputeService;
use crate::ledger::LedgerService;
use crate::profiles::ProfileService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub commission_service: Arc<CommissionService>,
    pub ledger_service: Arc<LedgerService>,
    pub deal_service: Arc<DealService>,
    pub dispute_service: Arc<DisputeService>,
    pub campaign_service: Arc<CampaignService>,
}

impl AppState {
    /// Wire up the full service graph over one pool
    pub fn new(db_pool: PgPool, jwt_secret: String) -> Self {
        let auth_service = Arc::new(AuthService::new(jwt_secret));
        let profile_service = Arc::new(ProfileService::new(db_pool.clone()));
        let commission_service = Arc::new(CommissionService::new(db_pool.clone()));
        let ledger_service = Arc::new(LedgerService::new(db_pool.clone()));
        let deal_service = Arc::new(DealService::new(
            db_pool.clone(),
            (*commission_service).clone(),
            (*ledger_service).clone(),
            (*profile_service).clone(),
        ));
        let dispute_service = Arc::new(DisputeService::new(db_pool.clone()));
        let campaign_service = Arc::new(CampaignService::new(
            db_pool.clone(),
            (*deal_service).clone(),
            (*profile_service).clone(),
        ));

        Self {
            db_pool,
            auth_service,
            profile_service,
            commission_service,
            ledger_service,
            deal_service,
            dispute_service,
            campaign_service,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProfileService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.profile_service.clone()
    }
}

impl FromRef<AppState> for Arc<CommissionService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.commission_service.clone()
    }
}

impl FromRef<AppState> for Arc<LedgerService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger_service.clone()
    }
}

impl FromRef<AppState> for Arc<DealService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.deal_service.clone()
    }
}

impl FromRef<AppState> for Arc<DisputeService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispute_service.clone()
    }
}

impl FromRef<AppState> for Arc<CampaignService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.campaign_service.clone()
    }
}
