//! VS Code / GitHub Copilot settings renderer
//!
//! Owns the `github.copilot.chat.customOAIModels` key of the editor's
//! settings.json; everything else in the file is left alone.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::core::{ModelDescriptor, ModelKind, Result};
use crate::lmstudio::normalize_base_url;
use crate::writer::{apply_update, Confirm, WriteOutcome};

use super::{detect_indentation, read_json_document, to_json_string};

/// Settings key this tool owns
pub const SETTINGS_KEY: &str = "github.copilot.chat.customOAIModels";

const DEFAULT_CONTEXT: u64 = 8192;

/// One custom OAI model entry, serialized with stable (alphabetical) field order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopilotModel {
    max_input_tokens: u64,
    max_output_tokens: u64,
    name: String,
    #[serde(rename = "requiresAPIKey")]
    requires_api_key: bool,
    thinking: bool,
    tool_calling: bool,
    url: String,
    vision: bool,
}

/// Generate the owned section: one entry per LLM model, sorted by id
pub fn generate_config(
    models: &[ModelDescriptor],
    base_url: &str,
) -> BTreeMap<String, CopilotModel> {
    let url = normalize_base_url(base_url);
    let mut config = BTreeMap::new();

    for model in models {
        if model.kind != ModelKind::Llm {
            continue;
        }
        let context = model.max_context_length.unwrap_or(DEFAULT_CONTEXT);

        config.insert(
            model.id.clone(),
            CopilotModel {
                max_input_tokens: context,
                max_output_tokens: context,
                name: model.id.clone(),
                requires_api_key: false,
                // Thinking defaults to on; users tune it per model afterwards
                thinking: true,
                tool_calling: model.tool_calling,
                url: url.clone(),
                vision: model.vision,
            },
        );
    }

    config
}

/// Merge the generated section into settings.json and run the writer
pub fn update_settings_file(
    path: &Path,
    models: &[ModelDescriptor],
    base_url: &str,
    confirm: &mut dyn Confirm,
) -> Result<WriteOutcome> {
    let config = generate_config(models, base_url);
    let model_count = config.len();

    let (old_content, mut settings) = read_json_document(path)?;
    let indent = if old_content.is_empty() {
        2
    } else {
        detect_indentation(&old_content)
    };

    let section = serde_json::to_value(&config)?;
    settings
        .as_object_mut()
        .expect("read_json_document returns an object")
        .insert(SETTINGS_KEY.to_string(), section);

    let new_content = to_json_string(&settings, indent)?;
    let outcome = apply_update(path, &old_content, &new_content, "settings", "json", confirm)?;

    if matches!(outcome, WriteOutcome::Applied { .. }) {
        println!(
            "Successfully updated {} with {} models",
            path.display(),
            model_count
        );
    }
    Ok(outcome)
}
