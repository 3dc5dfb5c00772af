//! Campaign and application routes

use axum::{
    routing::{patch, post},
    Router,
};

use crate::handlers::campaigns::{
    apply_to_campaign, create_campaign, list_applications, update_application,
};
use crate::state::AppState;

pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns", post(create_campaign))
        .route(
            "/api/campaigns/:id/applications",
            post(apply_to_campaign).get(list_applications),
        )
        .route(
            "/api/campaigns/:id/applications/:application_id",
            patch(update_application),
        )
}
