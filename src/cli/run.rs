//! CLI run flows
//!
//! Sequencing for the three invocation shapes: a single explicit target,
//! `--settings all`, and the connection-failure hints shown when the fetch
//! cannot reach LM Studio.

use std::path::Path;

use crate::core::{ModelDescriptor, Result};
use crate::targets::Target;
use crate::writer::{Confirm, WriteOutcome};

/// Outcome tally for a `--settings all` run
#[derive(Debug, Default)]
pub struct AllSummary {
    /// Targets whose file was written or already up to date
    pub applied: usize,
    /// Targets skipped because their default file does not exist
    pub skipped: usize,
    /// Targets the user declined at the confirmation prompt
    pub cancelled: usize,
    /// Targets that errored (unparseable file, backup or write failure)
    pub failed: usize,
}

/// Run the writer for one explicitly selected target
pub fn sync_target(
    target: Target,
    path: &Path,
    models: &[ModelDescriptor],
    base_url: &str,
    confirm: &mut dyn Confirm,
) -> Result<WriteOutcome> {
    println!("Using {}: {}", target.label(), path.display());

    let outcome = target.sync(path, models, base_url, confirm)?;
    if matches!(outcome, WriteOutcome::Cancelled) {
        println!("Operation cancelled by user");
    }
    Ok(outcome)
}

/// Update every target whose default config file exists on disk
///
/// Missing files are skipped with a notice. One target failing (or being
/// declined) never stops the remaining targets; each outcome is reported on
/// its own and tallied in the summary.
pub fn sync_all(
    models: &[ModelDescriptor],
    base_url: &str,
    confirm: &mut dyn Confirm,
) -> AllSummary {
    let mut summary = AllSummary::default();

    for target in Target::ALL {
        let path = match target.default_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Skipping {}: {}", target.name(), e);
                summary.skipped += 1;
                continue;
            }
        };

        if !path.exists() {
            println!("Skipping {}: file not found at {}", target.name(), path.display());
            summary.skipped += 1;
            continue;
        }

        println!("Using {}: {}", target.label(), path.display());
        match target.sync(&path, models, base_url, confirm) {
            Ok(WriteOutcome::Cancelled) => {
                println!("Operation cancelled by user");
                summary.cancelled += 1;
            }
            Ok(_) => summary.applied += 1,
            Err(e) => {
                eprintln!("Error updating {}: {}", target.name(), e);
                summary.failed += 1;
            }
        }
    }

    if summary.applied == 0 && summary.failed == 0 && summary.cancelled == 0 {
        println!("No installed harness config files found. Nothing to update.");
    } else {
        println!(
            "Finished: updated {} target(s), skipped {}.",
            summary.applied,
            summary.skipped + summary.cancelled
        );
    }

    summary
}

/// Troubleshooting hints for a failed connection to LM Studio
pub fn print_connection_hints() {
    eprintln!();
    eprintln!("Please ensure:");
    eprintln!("  1. LM Studio is running");
    eprintln!("  2. Local server is started in LM Studio");
    eprintln!("  3. Server is listening on the host/port from --base-url");
    eprintln!();
    eprintln!("If LM Studio is running on a different host/port, use:");
    eprintln!("  --base-url http://HOST:PORT/v1");
}
