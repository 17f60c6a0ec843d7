//! LM Studio client implementation
//!
//! Async HTTP client for the LM Studio v1 REST API. The only call this tool
//! needs is the model listing, parsed defensively: malformed entries are
//! skipped with a warning, a malformed response aborts the invocation.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::{Position, Url};

use crate::core::{Config, LmSyncError, ModelDescriptor, ModelKind, Result};

/// Fallback endpoint when the base URL cannot be parsed
const DEFAULT_MODELS_ENDPOINT: &str = "http://localhost:1234/api/v1/models";

/// LM Studio API client
#[derive(Clone)]
pub struct LmStudioClient {
    client: Client,
    endpoint: String,
}

/// One entry of the v1 `models` array, with only the fields this tool reads
#[derive(Debug, Deserialize)]
struct RawModel {
    key: Option<String>,
    #[serde(rename = "type")]
    kind: Option<ModelKind>,
    max_context_length: Option<u64>,
    #[serde(default)]
    capabilities: RawCapabilities,
}

/// v1 capabilities object
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCapabilities {
    trained_for_tool_use: bool,
    vision: bool,
}

impl LmStudioClient {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.server.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: models_endpoint(&config.server.base_url),
        }
    }

    /// Fetch the model list
    ///
    /// Entries without a `key` (or otherwise malformed) are skipped with a
    /// warning rather than failing the whole fetch.
    pub async fn fetch_models(&self) -> Result<Vec<ModelDescriptor>> {
        let response = self.client.get(&self.endpoint).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                LmSyncError::network(format!(
                    "Could not connect to LM Studio at {}",
                    self.endpoint
                ))
            } else {
                LmSyncError::from(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LmSyncError::network(format!(
                "LM Studio API error ({}): {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LmSyncError::schema(format!("Response is not valid JSON: {}", e)))?;

        parse_models(&payload)
    }
}

/// Parse the v1 model list payload into descriptors
pub fn parse_models(payload: &serde_json::Value) -> Result<Vec<ModelDescriptor>> {
    let entries = payload
        .get("models")
        .and_then(|m| m.as_array())
        .ok_or_else(|| {
            LmSyncError::schema("Unexpected model list response format: expected 'models' array")
        })?;

    Ok(entries.iter().filter_map(descriptor_from_entry).collect())
}

/// Convert one raw entry into a descriptor, or skip it with a warning
fn descriptor_from_entry(entry: &serde_json::Value) -> Option<ModelDescriptor> {
    let raw: RawModel = match serde_json::from_value(entry.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Warning: skipping malformed model entry: {}", e);
            return None;
        }
    };

    let Some(id) = raw.key else {
        eprintln!("Warning: skipping model entry without a key");
        return None;
    };

    Some(ModelDescriptor {
        id,
        kind: raw.kind.unwrap_or(ModelKind::Unknown),
        max_context_length: raw.max_context_length,
        tool_calling: raw.capabilities.trained_for_tool_use,
        vision: raw.capabilities.vision,
    })
}

/// Ensure a base URL ends with `/v1` for OpenAI-compatible clients
pub fn normalize_base_url(url: &str) -> String {
    let base = url.trim_end_matches('/');
    if base.ends_with("/v1") {
        base.to_string()
    } else {
        format!("{}/v1", base)
    }
}

/// Derive the REST models endpoint from the configured base URL
///
/// Keeps only scheme and authority of the base URL so that
/// `http://studio.local:1234/v1` resolves to
/// `http://studio.local:1234/api/v1/models`.
pub fn models_endpoint(base_url: &str) -> String {
    let mut base = base_url.trim_end_matches('/');
    if let Some(stripped) = base.strip_suffix("/v1") {
        base = stripped.trim_end_matches('/');
    }

    match Url::parse(base) {
        Ok(parsed) if parsed.has_host() => {
            format!("{}/api/v1/models", &parsed[..Position::BeforePath])
        }
        _ => DEFAULT_MODELS_ENDPOINT.to_string(),
    }
}
