//! File writer with preview, confirmation, backup, and atomic replace
//!
//! Every target update funnels through [`apply_update`]: diff the rendered
//! document against what is on disk, prompt, back the old file up, then
//! atomically replace it. An identical document short-circuits to
//! [`WriteOutcome::Unchanged`] with no prompt, no backup, and no write.

pub mod diff;
pub mod prompt;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;

use crate::core::{LmSyncError, Result};

pub use diff::render_changes;
pub use prompt::{AssumeYes, Confirm, StdinConfirm};

/// Observable result of one writer run
#[derive(Debug)]
pub enum WriteOutcome {
    /// Rendered document matched the existing file; nothing was done
    Unchanged,
    /// File was replaced; `backup` is the pre-write copy, when one was made
    Applied { backup: Option<PathBuf> },
    /// User declined at the confirmation prompt; file untouched
    Cancelled,
}

/// Run the preview/confirm/backup/write sequence for one target file
pub fn apply_update(
    path: &Path,
    old_content: &str,
    new_content: &str,
    fallback_stem: &str,
    extension: &str,
    confirm: &mut dyn Confirm,
) -> Result<WriteOutcome> {
    let Some(changes) = render_changes(old_content, new_content) else {
        println!("No changes detected.");
        return Ok(WriteOutcome::Unchanged);
    };

    println!("\nDiff preview for: {}\n", path.display());
    print!("{}", changes);

    if !confirm.confirm("\nApply these changes? [y/N]: ")? {
        return Ok(WriteOutcome::Cancelled);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                LmSyncError::write_file(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let backup = if path.exists() {
        let backup_path = create_backup(path, fallback_stem, extension)?;
        println!("Created backup at {}", backup_path.display());
        Some(backup_path)
    } else {
        None
    };

    write_atomic(path, new_content)?;
    Ok(WriteOutcome::Applied { backup })
}

/// Copy the existing file to a dated sibling, e.g. `settings.250806-0.backup.json`
///
/// The numeric suffix increments until the name is unique. Backups are never
/// deleted by this tool.
pub fn create_backup(path: &Path, fallback_stem: &str, extension: &str) -> Result<PathBuf> {
    let date_tag = Local::now().format("%y%m%d").to_string();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback_stem);

    let mut index = 0;
    let backup_path = loop {
        let name = format!("{}.{}-{}.backup.{}", stem, date_tag, index, extension);
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            break candidate;
        }
        index += 1;
    };

    fs::copy(path, &backup_path).map_err(|e| {
        LmSyncError::backup(format!(
            "Failed to back up {} to {}: {}",
            path.display(),
            backup_path.display(),
            e
        ))
    })?;

    Ok(backup_path)
}

/// Replace the file content in one rename, so a failed write never leaves a
/// half-written target behind
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| LmSyncError::write_file(format!("Failed to stage write: {}", e)))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| LmSyncError::write_file(format!("Failed to stage write: {}", e)))?;
    tmp.persist(path).map_err(|e| {
        LmSyncError::write_file(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted answers for exercising the state machine without a TTY
    struct Scripted(Vec<bool>);

    impl Confirm for Scripted {
        fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            Ok(self.0.remove(0))
        }
    }

    fn backups_in(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".backup."))
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_unchanged_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("settings.json");
        fs::write(&target, "{}").unwrap();

        // No prompts scripted: reaching the prompt would panic
        let mut confirm = Scripted(vec![]);
        let outcome = apply_update(&target, "{}", "{}", "settings", "json", &mut confirm).unwrap();

        assert!(matches!(outcome, WriteOutcome::Unchanged));
        assert!(backups_in(dir.path()).is_empty());
    }

    #[test]
    fn test_declined_confirmation_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("settings.json");
        fs::write(&target, "old").unwrap();

        let mut confirm = Scripted(vec![false]);
        let outcome = apply_update(&target, "old", "new", "settings", "json", &mut confirm).unwrap();

        assert!(matches!(outcome, WriteOutcome::Cancelled));
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert!(backups_in(dir.path()).is_empty());
    }

    #[test]
    fn test_applied_write_backs_up_first() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("settings.json");
        fs::write(&target, "old").unwrap();

        let mut confirm = Scripted(vec![true]);
        let outcome = apply_update(&target, "old", "new", "settings", "json", &mut confirm).unwrap();

        let WriteOutcome::Applied { backup } = outcome else {
            panic!("expected Applied");
        };
        let backup = backup.expect("existing file must be backed up");
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("settings."));
        assert!(name.ends_with(".backup.json"));
    }

    #[test]
    fn test_new_file_gets_no_backup_but_still_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("agent").join("models.json");

        let mut confirm = Scripted(vec![true]);
        let outcome = apply_update(&target, "", "{}", "models", "json", &mut confirm).unwrap();

        let WriteOutcome::Applied { backup } = outcome else {
            panic!("expected Applied");
        };
        assert!(backup.is_none());
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn test_backup_sequence_increments() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("config.toml");
        fs::write(&target, "a = 1\n").unwrap();

        let first = create_backup(&target, "config", "toml").unwrap();
        let second = create_backup(&target, "config", "toml").unwrap();

        assert_ne!(first, second);
        let first_name = first.file_name().unwrap().to_string_lossy().into_owned();
        let second_name = second.file_name().unwrap().to_string_lossy().into_owned();
        assert!(first_name.contains("-0.backup.toml"));
        assert!(second_name.contains("-1.backup.toml"));
    }

    #[test]
    fn test_second_run_with_same_document_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("opencode.json");
        fs::write(&target, "old").unwrap();

        let mut confirm = Scripted(vec![true]);
        apply_update(&target, "old", "new", "opencode", "json", &mut confirm).unwrap();
        assert_eq!(backups_in(dir.path()).len(), 1);

        // Same rendered document again: no prompt, no second backup
        let mut confirm = Scripted(vec![]);
        let outcome = apply_update(&target, "new", "new", "opencode", "json", &mut confirm).unwrap();
        assert!(matches!(outcome, WriteOutcome::Unchanged));
        assert_eq!(backups_in(dir.path()).len(), 1);
    }
}
