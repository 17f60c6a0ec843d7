//! Supported downstream clients and their config documents
//!
//! One renderer module per target. Each renderer produces the tool-owned
//! section of the target's config file and merges it into whatever already
//! exists there; nothing outside the owned section is touched.

pub mod codex;
pub mod copilot;
pub mod opencode;
pub mod pi;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::{LmSyncError, ModelDescriptor, Result};
use crate::writer::{Confirm, WriteOutcome};

/// A downstream client this tool can configure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// VS Code (GitHub Copilot custom OAI models)
    Code,
    /// VS Code Insiders
    CodeInsiders,
    /// OpenCode opencode.json
    OpenCode,
    /// Pi models.json
    Pi,
    /// Codex config.toml
    Codex,
}

impl Target {
    /// Fixed processing order for `--settings all`
    pub const ALL: [Target; 5] = [
        Target::Code,
        Target::CodeInsiders,
        Target::OpenCode,
        Target::Pi,
        Target::Codex,
    ];

    /// CLI-facing name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::CodeInsiders => "code-insiders",
            Self::OpenCode => "opencode",
            Self::Pi => "pi",
            Self::Codex => "codex",
        }
    }

    /// Human label used in "Using <label>: <path>" messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Code | Self::CodeInsiders => "settings file",
            Self::OpenCode => "opencode file",
            Self::Pi => "pi models file",
            Self::Codex => "codex config file",
        }
    }

    /// Platform-conventional default path for this target's config file
    pub fn default_path(&self) -> Result<PathBuf> {
        match self {
            Self::Code => editor_settings_path("Code"),
            Self::CodeInsiders => editor_settings_path("Code - Insiders"),
            Self::OpenCode => Ok(home_dir()?.join(".opencode").join("opencode.json")),
            Self::Pi => Ok(home_dir()?.join(".pi").join("agent").join("models.json")),
            Self::Codex => Ok(home_dir()?.join(".codex").join("config.toml")),
        }
    }

    /// Render this target's document and run the writer against `path`
    pub fn sync(
        &self,
        path: &Path,
        models: &[ModelDescriptor],
        base_url: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<WriteOutcome> {
        match self {
            Self::Code | Self::CodeInsiders => {
                copilot::update_settings_file(path, models, base_url, confirm)
            }
            Self::OpenCode => opencode::update_opencode_file(path, models, base_url, confirm),
            Self::Pi => pi::update_pi_file(path, models, base_url, confirm),
            Self::Codex => codex::update_codex_file(path, models, base_url, confirm),
        }
    }
}

/// VS Code keeps user settings under the platform config dir on every OS
fn editor_settings_path(product_dir: &str) -> Result<PathBuf> {
    let config = dirs::config_dir()
        .ok_or_else(|| LmSyncError::config("Could not determine the user config directory"))?;
    Ok(config.join(product_dir).join("User").join("settings.json"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| LmSyncError::config("Could not determine the home directory"))
}

/// Read a JSON(C) target file, tolerating comments and trailing commas
///
/// Returns the raw content alongside the parsed object; a missing file reads
/// as an empty object. An unreadable, unparseable, or non-object file is a
/// target-file error (the caller decides whether that aborts one target or
/// the whole run).
pub(crate) fn read_json_document(path: &Path) -> Result<(String, serde_json::Value)> {
    if !path.exists() {
        return Ok((String::new(), serde_json::Value::Object(Default::default())));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        LmSyncError::target_file(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let parsed: serde_json::Value = json5::from_str(&content).map_err(|e| {
        LmSyncError::target_file(format!("Could not parse {}: {}", path.display(), e))
    })?;

    if !parsed.is_object() {
        return Err(LmSyncError::target_file(format!(
            "{} is not a JSON object",
            path.display()
        )));
    }

    Ok((content, parsed))
}

/// Get `map[key]` as an object, replacing any non-object value with `{}`
///
/// Other keys in the map are untouched; this only claims the named slot.
pub(crate) fn ensure_object<'a>(
    map: &'a mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> &'a mut serde_json::Map<String, serde_json::Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| serde_json::Value::Object(Default::default()));
    if !entry.is_object() {
        *entry = serde_json::Value::Object(Default::default());
    }
    entry.as_object_mut().expect("ensured above")
}

/// Detect the indentation width of existing content, defaulting to 2
pub(crate) fn detect_indentation(content: &str) -> usize {
    for line in content.lines() {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        if indent > 0 {
            return indent;
        }
    }
    2
}

/// Serialize a JSON document with the given indentation width
pub(crate) fn to_json_string(value: &serde_json::Value, indent: usize) -> Result<String> {
    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(out).expect("serde_json emits UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_order_is_stable() {
        let names: Vec<_> = Target::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["code", "code-insiders", "opencode", "pi", "codex"]);
    }

    #[test]
    fn test_default_paths_per_target() {
        let opencode = Target::OpenCode.default_path().unwrap();
        assert!(opencode.ends_with(".opencode/opencode.json"));

        let pi = Target::Pi.default_path().unwrap();
        assert!(pi.ends_with(".pi/agent/models.json"));

        let codex = Target::Codex.default_path().unwrap();
        assert!(codex.ends_with(".codex/config.toml"));

        let code = Target::Code.default_path().unwrap();
        assert!(code.ends_with("Code/User/settings.json"));

        let insiders = Target::CodeInsiders.default_path().unwrap();
        assert!(insiders.ends_with("Code - Insiders/User/settings.json"));
    }

    #[test]
    fn test_detect_indentation() {
        assert_eq!(detect_indentation("{\n    \"a\": 1\n}"), 4);
        assert_eq!(detect_indentation("{\n  \"a\": 1\n}"), 2);
        assert_eq!(detect_indentation("{\n\t\"a\": 1\n}"), 1);
        assert_eq!(detect_indentation("{}"), 2);
        assert_eq!(detect_indentation(""), 2);
    }

    #[test]
    fn test_to_json_string_honors_indent() {
        let value = serde_json::json!({ "a": { "b": 1 } });
        let four = to_json_string(&value, 4).unwrap();
        assert!(four.contains("\n    \"a\""));
        let two = to_json_string(&value, 2).unwrap();
        assert!(two.contains("\n  \"a\""));
    }
}
