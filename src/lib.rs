//! HTTP server for the Waikane flood dashboard.
//!
//! Four read-only routes hand out JSON datasets (tide observations, two
//! stream gauges and a tide curve). Before each response the server re-runs
//! the data-processing notebook that produces them, then serves whatever the
//! file on disk holds.
//!
//! * [`api`] builds the axum router.
//! * [`regenerator`] runs the external computation.
//! * [`store`] reads the artifacts back.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod regenerator;
pub mod store;
