//! Codex config renderer
//!
//! Owns the `model_providers.lmstudio_local` table and the generated
//! `profiles.lmstudio-*` tables of Codex's config.toml. The file is edited
//! in place with toml_edit, so unrelated tables (and the top-level
//! `model_provider` selection) come out byte-identical.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use toml_edit::{value, DocumentMut, Item, Table};

use crate::core::{LmSyncError, ModelDescriptor, ModelKind, Result};
use crate::lmstudio::normalize_base_url;
use crate::writer::{apply_update, Confirm, WriteOutcome};

/// Provider id this tool owns inside `model_providers`
pub const PROVIDER_ID: &str = "lmstudio_local";

/// Prefix of generated profile names; profiles under it that point at our
/// provider are pruned when the model disappears from the filtered set
pub const PROFILE_PREFIX: &str = "lmstudio-";

const PROVIDER_NAME: &str = "LM Studio (local)";
const WIRE_API: &str = "responses";

/// A generated Codex profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodexProfile {
    pub model: String,
    pub model_provider: String,
}

/// Stable, CLI-friendly profile name for a model id
///
/// Lowercases, collapses non-alphanumeric runs to `-`, and disambiguates
/// collisions with a numeric suffix.
pub fn profile_name(model_id: &str, used: &mut HashSet<String>) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for c in model_id.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    let slug = if slug.is_empty() { "model" } else { &slug };
    let base = format!("{}{}", PROFILE_PREFIX, slug);

    let mut name = base.clone();
    let mut index = 2;
    while used.contains(&name) {
        name = format!("{}-{}", base, index);
        index += 1;
    }

    used.insert(name.clone());
    name
}

/// Generate one profile per model id, deduplicated and sorted
pub fn generate_profiles<'a, I>(model_ids: I) -> BTreeMap<String, CodexProfile>
where
    I: IntoIterator<Item = &'a str>,
{
    let sorted: BTreeSet<&str> = model_ids.into_iter().collect();
    let mut used = HashSet::new();
    let mut profiles = BTreeMap::new();

    for id in sorted {
        let name = profile_name(id, &mut used);
        profiles.insert(
            name,
            CodexProfile {
                model: id.to_string(),
                model_provider: PROVIDER_ID.to_string(),
            },
        );
    }
    profiles
}

/// Write the owned tables into the document, returning the profile count
///
/// Extra keys on an existing provider or profile table are kept; only the
/// fields this tool generates are overwritten.
pub fn render_into(doc: &mut DocumentMut, models: &[ModelDescriptor], base_url: &str) -> usize {
    let llm_ids = models
        .iter()
        .filter(|m| m.kind == ModelKind::Llm)
        .map(|m| m.id.as_str());
    let profiles = generate_profiles(llm_ids);

    let providers = ensure_top_table(doc.as_table_mut(), "model_providers");
    let provider = ensure_table(providers, PROVIDER_ID);
    provider.insert("name", value(PROVIDER_NAME));
    provider.insert("base_url", value(normalize_base_url(base_url)));
    provider.insert("wire_api", value(WIRE_API));

    let profiles_table = ensure_top_table(doc.as_table_mut(), "profiles");

    // Prune stale generated profiles when filters narrow the model set
    let stale: Vec<String> = profiles_table
        .iter()
        .filter_map(|(name, item)| {
            if !name.starts_with(PROFILE_PREFIX) || profiles.contains_key(name) {
                return None;
            }
            let provider_of = item
                .as_table_like()
                .and_then(|t| t.get("model_provider"))
                .and_then(|i| i.as_str());
            (provider_of == Some(PROVIDER_ID)).then(|| name.to_string())
        })
        .collect();
    for name in stale {
        profiles_table.remove(&name);
    }

    for (name, profile) in &profiles {
        let entry = ensure_table(profiles_table, name);
        entry.insert("model", value(profile.model.as_str()));
        entry.insert("model_provider", value(profile.model_provider.as_str()));
    }

    profiles.len()
}

/// Merge the owned tables into config.toml and run the writer
pub fn update_codex_file(
    path: &Path,
    models: &[ModelDescriptor],
    base_url: &str,
    confirm: &mut dyn Confirm,
) -> Result<WriteOutcome> {
    let (old_content, mut doc) = read_toml_document(path)?;
    let profile_count = render_into(&mut doc, models, base_url);

    let new_content = doc.to_string();
    let outcome = apply_update(path, &old_content, &new_content, "config", "toml", confirm)?;

    if matches!(outcome, WriteOutcome::Applied { .. }) {
        println!(
            "Successfully updated {} with provider(s) '{}' and {} profiles",
            path.display(),
            PROVIDER_ID,
            profile_count
        );
    }
    Ok(outcome)
}

/// Read a TOML target file; a missing file reads as an empty document
fn read_toml_document(path: &Path) -> Result<(String, DocumentMut)> {
    if !path.exists() {
        return Ok((String::new(), DocumentMut::new()));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        LmSyncError::target_file(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let doc = content.parse::<DocumentMut>().map_err(|e| {
        LmSyncError::target_file(format!("Could not parse {}: {}", path.display(), e))
    })?;

    Ok((content, doc))
}

/// Get `parent[key]` as a standard table, converting or replacing other shapes
fn ensure_table<'a>(parent: &'a mut Table, key: &str) -> &'a mut Table {
    let item = parent
        .entry(key)
        .or_insert_with(|| Item::Table(Table::new()));

    if let Item::Value(toml_edit::Value::InlineTable(inline)) = item {
        *item = Item::Table(std::mem::take(inline).into_table());
    }
    if !item.is_table() {
        *item = Item::Table(Table::new());
    }
    item.as_table_mut().expect("ensured above")
}

/// Like [`ensure_table`], but a newly created table stays implicit so the
/// output has no bare `[model_providers]` header above its sub-tables
fn ensure_top_table<'a>(root: &'a mut Table, key: &str) -> &'a mut Table {
    if root.get(key).is_none() {
        let mut table = Table::new();
        table.set_implicit(true);
        root.insert(key, Item::Table(table));
    }
    ensure_table(root, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm(id: &str) -> ModelDescriptor {
        ModelDescriptor {
            id: id.to_string(),
            kind: ModelKind::Llm,
            max_context_length: Some(32768),
            tool_calling: true,
            vision: false,
        }
    }

    #[test]
    fn test_profile_name_slugging() {
        let mut used = HashSet::new();
        assert_eq!(profile_name("Qwen3-8B", &mut used), "lmstudio-qwen3-8b");
        assert_eq!(profile_name("org/model:tag", &mut used), "lmstudio-org-model-tag");
        assert_eq!(profile_name("***", &mut used), "lmstudio-model");
    }

    #[test]
    fn test_profile_name_collisions_get_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(profile_name("my model", &mut used), "lmstudio-my-model");
        assert_eq!(profile_name("my/model", &mut used), "lmstudio-my-model-2");
        assert_eq!(profile_name("my+model", &mut used), "lmstudio-my-model-3");
    }

    #[test]
    fn test_generate_profiles_dedup_and_sorted() {
        let profiles = generate_profiles(vec!["b-model", "a-model", "b-model"]);
        let names: Vec<_> = profiles.keys().cloned().collect();
        assert_eq!(names, ["lmstudio-a-model", "lmstudio-b-model"]);
        assert_eq!(profiles["lmstudio-a-model"].model, "a-model");
        assert_eq!(profiles["lmstudio-a-model"].model_provider, PROVIDER_ID);
    }

    #[test]
    fn test_render_preserves_unrelated_tables() {
        let existing = "\
model_provider = \"x\"

[other_section]
keep = \"me\"
";
        let mut doc: DocumentMut = existing.parse().unwrap();
        render_into(&mut doc, &[llm("qwen3-8b")], "http://localhost:1234/v1");
        let rendered = doc.to_string();

        assert!(rendered.starts_with("model_provider = \"x\""));
        assert!(rendered.contains("[other_section]\nkeep = \"me\""));
        assert!(rendered.contains("[model_providers.lmstudio_local]"));
        assert!(rendered.contains("wire_api = \"responses\""));
        assert!(rendered.contains("[profiles.lmstudio-qwen3-8b]"));
        assert!(rendered.contains("model = \"qwen3-8b\""));
        // No bare parent headers for tables we created
        assert!(!rendered.contains("\n[model_providers]\n"));
        assert!(!rendered.contains("\n[profiles]\n"));
    }

    #[test]
    fn test_render_prunes_stale_generated_profiles() {
        let existing = "\
[model_providers.lmstudio_local]
name = \"LM Studio (local)\"

[profiles.lmstudio-old-model]
model = \"old-model\"
model_provider = \"lmstudio_local\"

[profiles.lmstudio-mine]
model = \"kept\"
model_provider = \"someone_else\"

[profiles.handwritten]
model = \"old-model\"
model_provider = \"lmstudio_local\"
";
        let mut doc: DocumentMut = existing.parse().unwrap();
        render_into(&mut doc, &[llm("new-model")], "http://localhost:1234/v1");
        let rendered = doc.to_string();

        // Generated profile for a model that vanished is pruned
        assert!(!rendered.contains("lmstudio-old-model"));
        // Prefixed profile pointing at a different provider is kept
        assert!(rendered.contains("[profiles.lmstudio-mine]"));
        // Unprefixed profile is never pruned, even on our provider
        assert!(rendered.contains("[profiles.handwritten]"));
        assert!(rendered.contains("[profiles.lmstudio-new-model]"));
    }

    #[test]
    fn test_render_keeps_extra_profile_keys() {
        let existing = "\
[profiles.lmstudio-qwen3-8b]
model = \"stale-id\"
model_provider = \"lmstudio_local\"
approval_policy = \"never\"
";
        let mut doc: DocumentMut = existing.parse().unwrap();
        render_into(&mut doc, &[llm("qwen3-8b")], "http://localhost:1234/v1");
        let rendered = doc.to_string();

        assert!(rendered.contains("approval_policy = \"never\""));
        assert!(rendered.contains("model = \"qwen3-8b\""));
        assert!(!rendered.contains("stale-id"));
    }

    #[test]
    fn test_render_with_no_models_still_writes_provider() {
        let mut doc = DocumentMut::new();
        let count = render_into(&mut doc, &[], "http://localhost:1234/v1");
        assert_eq!(count, 0);
        let rendered = doc.to_string();
        assert!(rendered.contains("[model_providers.lmstudio_local]"));
        assert!(rendered.contains("base_url = \"http://localhost:1234/v1\""));
    }
}
