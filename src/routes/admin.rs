//! Admin routes: commissions, disputes, ledger and issuer verification

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::admin::{
    get_commissions, ledger_summary, list_open_disputes, pending_issuers, reset_blogger_commission,
    resolve_dispute, set_blogger_commission, set_global_commission, verify_issuer,
};
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/commissions", get(get_commissions))
        .route("/api/admin/commissions/global", put(set_global_commission))
        .route(
            "/api/admin/commissions/bloggers/:blogger_id",
            put(set_blogger_commission).delete(reset_blogger_commission),
        )
        .route("/api/admin/disputes", get(list_open_disputes))
        .route("/api/admin/disputes/:id/resolve", post(resolve_dispute))
        .route("/api/admin/ledger/summary", get(ledger_summary))
        .route("/api/admin/issuers/pending", get(pending_issuers))
        .route("/api/admin/issuers/:id/verify", post(verify_issuer))
}
