//! lmsync - LM Studio agent-config generator
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use lmsync::cli;
use lmsync::core::{filter_models, CapabilityFilter, Config, FilterCriteria, LmSyncError};
use lmsync::writer::{AssumeYes, Confirm, StdinConfirm};
use lmsync::{LmStudioClient, Target};

/// Generate Copilot, OpenCode, Pi, or Codex configuration from LM Studio
#[derive(Parser, Debug)]
#[command(name = "lmsync")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Auto-detect and update a target's settings file
    #[arg(long, value_enum)]
    settings: Option<SettingsArg>,

    /// Path to the settings file (overrides --settings auto-detect; prints a
    /// model list if neither --settings nor --settings-path is provided)
    #[arg(long)]
    settings_path: Option<PathBuf>,

    /// Base URL to write in config (where the client will connect)
    #[arg(long)]
    base_url: Option<String>,

    /// Only include models with max_context_length >= TOKENS
    #[arg(long, value_name = "TOKENS")]
    min_context: Option<u64>,

    /// Only include models that support tool use
    #[arg(long, conflicts_with = "no_tools")]
    tools: bool,

    /// Only include models that do not support tool use
    #[arg(long)]
    no_tools: bool,

    /// Only include models that support vision
    #[arg(long, conflicts_with = "no_vision")]
    vision: bool,

    /// Only include models that do not support vision
    #[arg(long)]
    no_vision: bool,

    /// Apply changes without asking for confirmation
    #[arg(long, short = 'y')]
    yes: bool,
}

/// Accepted values for --settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SettingsArg {
    Code,
    CodeInsiders,
    Opencode,
    Pi,
    Codex,
    All,
}

impl SettingsArg {
    fn target(&self) -> Option<Target> {
        match self {
            Self::Code => Some(Target::Code),
            Self::CodeInsiders => Some(Target::CodeInsiders),
            Self::Opencode => Some(Target::OpenCode),
            Self::Pi => Some(Target::Pi),
            Self::Codex => Some(Target::Codex),
            Self::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.settings == Some(SettingsArg::All) && args.settings_path.is_some() {
        anyhow::bail!("--settings-path cannot be used with --settings all.");
    }

    // Build configuration and apply CLI overrides
    let mut config = Config::load();
    if let Some(ref base_url) = args.base_url {
        config.server.base_url = base_url.clone();
    }

    let criteria = FilterCriteria {
        min_context: args.min_context,
        tools: CapabilityFilter::from_flags(args.tools, args.no_tools),
        vision: CapabilityFilter::from_flags(args.vision, args.no_vision),
    };

    let client = LmStudioClient::from_config(&config);
    let all_models = match client.fetch_models().await {
        Ok(models) => models,
        Err(LmSyncError::Network(message)) => {
            eprintln!("\nError: {}", message);
            cli::print_connection_hints();
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    let filtered = filter_models(&all_models, &criteria);

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    match (args.settings, args.settings_path) {
        // No target: print the filtered model list
        (None, None) => {
            print!(
                "{}",
                cli::render_models_listing(&all_models, &filtered, &criteria)
            );
        }

        // Every target whose default file is installed
        (Some(SettingsArg::All), _) => {
            let summary = cli::sync_all(&filtered, &config.server.base_url, confirm.as_mut());
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }

        // One target, at its default or overridden path
        (settings, settings_path) => {
            // A bare --settings-path targets the editor settings renderer
            let target = settings
                .and_then(|s| s.target())
                .unwrap_or(Target::Code);
            let path = match settings_path {
                Some(path) => path,
                None => target.default_path()?,
            };
            cli::sync_target(target, &path, &filtered, &config.server.base_url, confirm.as_mut())?;
        }
    }

    Ok(())
}
