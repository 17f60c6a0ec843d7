//! lmsync - LM Studio agent-config generator
//!
//! Discovers the models served by a local LM Studio instance and syncs them
//! into the configuration of downstream coding agents: GitHub Copilot's
//! custom OAI models (VS Code settings.json), OpenCode's opencode.json,
//! Pi's models.json, and Codex's config.toml.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LM Studio**: REST client and URL plumbing for the local server
//! - **Targets**: One renderer per downstream client, merging the generated
//!   section into whatever the target file already contains
//! - **Writer**: Diff preview, confirmation, dated backups, atomic replace
//! - **CLI**: Model listing and the run flows
//!
//! # Usage
//!
//! ```rust,no_run
//! use lmsync::core::Config;
//! use lmsync::lmstudio::LmStudioClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = LmStudioClient::from_config(&Config::load());
//!     let models = client.fetch_models().await.unwrap();
//!     println!("{} models available", models.len());
//! }
//! ```

pub mod cli;
pub mod core;
pub mod lmstudio;
pub mod targets;
pub mod writer;

// Re-export commonly used items
pub use crate::core::{Config, LmSyncError, Result};
pub use crate::lmstudio::LmStudioClient;
pub use crate::targets::Target;
