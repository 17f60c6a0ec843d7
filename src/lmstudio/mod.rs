//! LM Studio API access
//!
//! Client and URL plumbing for the local LM Studio server.

pub mod client;

pub use client::{models_endpoint, normalize_base_url, parse_models, LmStudioClient};
