//! Prompt-driven mode, used when `tanshin` runs without a subcommand.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use tanshin_cli_utils::MultiProgress;

use crate::commands::{self, ExtractArgs};
use crate::config::TanshinConfig;
use crate::output::OutputFormat;

/// Top-level actions of the interactive menu.
enum Action {
    Extract,
    Inspect,
}

impl Action {
    const ALL: &[Self] = &[Self::Extract, Self::Inspect];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Extract => "Extract segment rows",
            Self::Inspect => "Inspect segment tables of one file",
        }
    }
}

/// Asks what to do and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails, the config file cannot be loaded, or
/// the chosen command fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let config_input: String = Input::new()
        .with_prompt("Config file (empty for defaults)")
        .allow_empty(true)
        .interact_text()?;
    let config = TanshinConfig::load(config_path(&config_input).as_deref())?;

    match Action::ALL[idx] {
        Action::Extract => {
            let paths: String = Input::new()
                .with_prompt("Files or directories (space-separated)")
                .default(".".to_string())
                .interact_text()?;

            let formats = ["json", "csv"];
            let format = match Select::new()
                .with_prompt("Output format")
                .items(&formats)
                .default(0)
                .interact()?
            {
                0 => OutputFormat::Json,
                _ => OutputFormat::Csv,
            };

            let args = ExtractArgs {
                paths: paths.split_whitespace().map(PathBuf::from).collect(),
                format,
                expected_tables: None,
                log: None,
            };
            commands::extract(multi, &config, &args)?;
        }
        Action::Inspect => {
            let path: String = Input::new().with_prompt("File").interact_text()?;
            commands::inspect(&config, &PathBuf::from(path))?;
        }
    }

    Ok(())
}

/// The config path typed at the prompt, if any.
fn config_path(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    (!input.is_empty()).then(|| PathBuf::from(input))
}
