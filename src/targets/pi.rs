//! Pi provider renderer
//!
//! Owns the `providers.lmstudio` subtree of Pi's models.json.

use std::path::Path;

use serde_json::{json, Value};

use crate::core::{ModelDescriptor, ModelKind, Result};
use crate::lmstudio::normalize_base_url;
use crate::writer::{apply_update, Confirm, WriteOutcome};

use super::{detect_indentation, ensure_object, read_json_document, to_json_string};

/// Provider id this tool owns inside `providers`
pub const PROVIDER_ID: &str = "lmstudio";

const PROVIDER_API: &str = "openai-completions";
const PROVIDER_API_KEY: &str = "lm-studio";

const DEFAULT_CONTEXT: u64 = 8192;

/// Generate the provider's model array, sorted by id
pub fn generate_models(models: &[ModelDescriptor]) -> Vec<Value> {
    let mut sorted: Vec<&ModelDescriptor> =
        models.iter().filter(|m| m.kind == ModelKind::Llm).collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    sorted
        .into_iter()
        .map(|model| {
            let context = model.max_context_length.unwrap_or(DEFAULT_CONTEXT);
            let input = if model.vision {
                json!(["text", "image"])
            } else {
                json!(["text"])
            };
            json!({
                "id": model.id,
                "name": model.id,
                "input": input,
                "contextWindow": context,
                "maxTokens": context,
            })
        })
        .collect()
}

/// Merge the generated provider into models.json and run the writer
pub fn update_pi_file(
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

    let providers = ensure_object(root, "providers");
    let provider = ensure_object(providers, PROVIDER_ID);
    provider.insert("baseUrl".to_string(), json!(normalize_base_url(base_url)));
    provider.insert("api".to_string(), json!(PROVIDER_API));
    provider.insert("apiKey".to_string(), json!(PROVIDER_API_KEY));
    provider.insert("models".to_string(), Value::Array(generated));

    let new_content = to_json_string(&document, indent)?;
    let outcome = apply_update(path, &old_content, &new_content, "models", "json", confirm)?;

    if matches!(outcome, WriteOutcome::Applied { .. }) {
        println!(
            "Successfully updated {} with {} models",
            path.display(),
            model_count
        );
    }
    Ok(outcome)
}
