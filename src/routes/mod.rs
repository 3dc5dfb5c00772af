//! Route definitions for the AdMarket API

mod admin;
mod campaigns;
mod deals;

pub use admin::admin_routes;
pub use campaigns::campaign_routes;
pub use deals::deal_routes;
