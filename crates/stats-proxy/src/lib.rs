//! Statistics proxy.
//!
//! Serves `GET /api/stats` by forwarding to a third-party statistics API
//! with a bearer token taken from configuration, so browsers never see the
//! credential.

pub mod config;
pub mod handler;
pub mod source;

pub use handler::build_app;
pub use source::{HttpStatsSource, StatsSource, StatsSourceError};
