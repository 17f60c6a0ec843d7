//! Model listing output
//!
//! Renders the discovered models as a human-readable report: summary counts,
//! LLM models with their capabilities and generated Codex profile names,
//! then everything else (embeddings and friends).

use std::fmt::Write;

use crate::core::{FilterCriteria, ModelDescriptor, ModelKind};
use crate::targets::codex;

/// Render the listing shown when no write target is selected
pub fn render_models_listing(
    all_models: &[ModelDescriptor],
    filtered: &[ModelDescriptor],
    criteria: &FilterCriteria,
) -> String {
    if filtered.is_empty() {
        return "No models matched the selected filters.\n".to_string();
    }

    let mut llm_rows: Vec<&ModelDescriptor> = filtered
        .iter()
        .filter(|m| m.kind == ModelKind::Llm)
        .collect();
    llm_rows.sort_by(|a, b| a.id.cmp(&b.id));

    let mut other_rows: Vec<&ModelDescriptor> = filtered
        .iter()
        .filter(|m| m.kind != ModelKind::Llm)
        .collect();
    other_rows.sort_by(|a, b| a.id.cmp(&b.id));

    let tools_count = llm_rows.iter().filter(|m| m.tool_calling).count();
    let vision_count = llm_rows.iter().filter(|m| m.vision).count();

    // Profile names mirror exactly what a codex write would generate
    let profiles = codex::generate_profiles(llm_rows.iter().map(|m| m.id.as_str()));
    let profile_by_model: std::collections::HashMap<&str, &str> = profiles
        .iter()
        .map(|(name, profile)| (profile.model.as_str(), name.as_str()))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "LM Studio Models");
    let _ = writeln!(out, "- showing: {} of {}", filtered.len(), all_models.len());
    let _ = writeln!(out, "- llm: {}", llm_rows.len());
    let _ = writeln!(out, "- tool-use: {}", tools_count);
    let _ = writeln!(out, "- vision: {}", vision_count);
    let min_context = criteria
        .min_context
        .map(|m| m.to_string())
        .unwrap_or_else(|| "any".to_string());
    let _ = writeln!(
        out,
        "- filters: min-context={}, tools={}, vision={}",
        min_context,
        criteria.tools.as_str(),
        criteria.vision.as_str()
    );
    let _ = writeln!(out);

    if !llm_rows.is_empty() {
        let _ = writeln!(out, "LLM Models");
    }
    for model in &llm_rows {
        let _ = writeln!(out, "- {}", model.id);
        let _ = writeln!(
            out,
            "  type: {} | context: {} | tools: {} | vision: {}",
            model.kind.as_str(),
            context_label(model),
            yes_no(model.tool_calling),
            yes_no(model.vision)
        );
        let profile = profile_by_model.get(model.id.as_str()).copied().unwrap_or("-");
        let _ = writeln!(out, "  codex-profile: {}", profile);
    }

    if !llm_rows.is_empty() && !other_rows.is_empty() {
        let _ = writeln!(out);
    }
    if !other_rows.is_empty() {
        let _ = writeln!(out, "Other Models");
    }
    for model in &other_rows {
        let _ = writeln!(out, "- {}", model.id);
        let _ = writeln!(
            out,
            "  type: {} | context: {} | tools: - | vision: -",
            model.kind.as_str(),
            context_label(model)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Tip: run codex --profile <name> to switch LM Studio models."
    );
    out
}

fn context_label(model: &ModelDescriptor) -> String {
    model
        .max_context_length
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
