//! Command-line interface module
//!
//! Listing output and the run flows that sequence fetch, render, and write.

pub mod render;
pub mod run;

pub use render::render_models_listing;
pub use run::{print_connection_hints, sync_all, sync_target, AllSummary};
