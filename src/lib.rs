//! Simulated vehicle telemetry dashboard.
//!
//! A background [`updater::Updater`] perturbs shared telemetry once per tick
//! while the axum [`server`] answers status queries with predictions from
//! two linear models fit at startup.

pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod state;
pub mod types;
pub mod updater;

pub use config::DashboardConfig;
pub use error::DashboardError;
pub use model::Models;
pub use server::{router, AppState};
pub use state::SharedTelemetry;
pub use updater::{stop_and_join, stop_channel, Updater};
