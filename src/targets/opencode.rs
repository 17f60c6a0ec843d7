//! OpenCode provider renderer
//!
//! Owns the `provider.lmstudio` subtree of opencode.json. The provider's
//! model list is replaced wholesale on every run; any extra keys a user has
//! added to the provider (or its options) survive.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::core::{ModelDescriptor, ModelKind, Result};
use crate::lmstudio::normalize_base_url;
use crate::writer::{apply_update, Confirm, WriteOutcome};

use super::{detect_indentation, ensure_object, read_json_document, to_json_string};

/// Provider id this tool owns inside `provider`
pub const PROVIDER_ID: &str = "lmstudio";

const PROVIDER_NAME: &str = "LM Studio (local)";
const PROVIDER_NPM: &str = "@ai-sdk/openai-compatible";
const SCHEMA_URL: &str = "https://opencode.ai/config.json";
const SCHEMA_URL_KEY: &str = "$schema";

const DEFAULT_CONTEXT: u64 = 8192;

/// Generate the provider's model map, sorted by id
pub fn generate_models(models: &[ModelDescriptor]) -> Map<String, Value> {
    let mut sorted: Vec<&ModelDescriptor> =
        models.iter().filter(|m| m.kind == ModelKind::Llm).collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut out = Map::new();
    for model in sorted {
        let context = model.max_context_length.unwrap_or(DEFAULT_CONTEXT);
        let input = if model.vision {
            json!(["text", "image"])
        } else {
            json!(["text"])
        };

        out.insert(
            model.id.clone(),
            json!({
                "name": model.id,
                "limit": {
                    "context": context,
                    "output": context,
                },
                "modalities": {
                    "input": input,
                    "output": ["text"],
                },
            }),
        );
    }
    out
}

/// Merge the generated provider into opencode.json and run the writer
pub fn update_opencode_file(
    path: &Path,
    models: &[ModelDescriptor],
    base_url: &str,
    confirm: &mut dyn Confirm,
) -> Result<WriteOutcome> {
    let generated = generate_models(models);
    let model_count = generated.len();

    let (old_content, mut document) = read_json_document(path)?;
    let indent = if old_content.is_empty() {
        2
    } else {
        detect_indentation(&old_content)
    };

    let root = document
        .as_object_mut()
        .expect("read_json_document returns an object");
    root.entry(SCHEMA_URL_KEY.to_string())
        .or_insert_with(|| Value::String(SCHEMA_URL.to_string()));

    let providers = ensure_object(root, "provider");
    let provider = ensure_object(providers, PROVIDER_ID);
    provider.insert("npm".to_string(), json!(PROVIDER_NPM));
    provider.insert("name".to_string(), json!(PROVIDER_NAME));

    let options = ensure_object(provider, "options");
    options.insert("baseURL".to_string(), json!(normalize_base_url(base_url)));

    provider.insert("models".to_string(), Value::Object(generated));

    let new_content = to_json_string(&document, indent)?;
    let outcome = apply_update(path, &old_content, &new_content, "opencode", "json", confirm)?;

    if matches!(outcome, WriteOutcome::Applied { .. }) {
        println!(
            "Successfully updated {} with {} models",
            path.display(),
            model_count
        );
    }
    Ok(outcome)
}
