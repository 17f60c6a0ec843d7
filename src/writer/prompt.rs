//! Yes/no confirmation capability
//!
//! The interactive prompt is behind a trait so automated runs (`--yes`) and
//! tests can swap in non-interactive implementations.

use std::io::{self, BufRead, Write};

use crate::core::Result;

/// Ask the user a yes/no question
pub trait Confirm {
    /// Returns true only on an affirmative answer; anything else is "no"
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Interactive prompt on stdin/stdout
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Non-interactive auto-confirmation for `--yes`
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}
