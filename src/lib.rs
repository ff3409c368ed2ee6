//! Movie recommendation pipeline: merges per-component score tables into a
//! weighted ranking, publishes it joined with movie metadata, and serves a
//! filterable browser over the published dataset.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
