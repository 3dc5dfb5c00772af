//! AdMarket Backend Library
//!
//! This library exports the core modules for the AdMarket backend server:
//! a sponsored-content marketplace with escrow-backed deals, campaigns,
//! commission management and dispute resolution.

pub mod auth;
pub mod campaigns;
pub mod commission;
pub mod config;
pub mod db;
pub mod deals;
pub mod disputes;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod middleware;
pub mod models;
pub mod profiles;
pub mod routes;
pub mod state;
