//! Deal lifecycle routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::deals::{
    confirm_deal, create_deal, deal_transactions, fund_escrow, get_deal, get_dispute, my_deals,
    open_dispute, submit_content,
};
use crate::state::AppState;

pub fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/api/deals", post(create_deal).get(my_deals))
        .route("/api/deals/:id", get(get_deal))
        .route("/api/deals/:id/fund", post(fund_escrow))
        .route("/api/deals/:id/content", post(submit_content))
        .route("/api/deals/:id/confirm", post(confirm_deal))
        .route("/api/deals/:id/dispute", post(open_dispute).get(get_dispute))
        .route("/api/deals/:id/transactions", get(deal_transactions))
}
