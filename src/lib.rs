pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod logging;
pub mod metrics;
pub mod presentation;
pub mod server;
pub mod types;
pub mod view;

// Rendering seam and its adapters
pub mod app;
pub mod infra;
