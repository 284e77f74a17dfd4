use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use dealer_core::project::HistoryEntry;
use dealer_core::{prepare_submission, validate_draft, validate_submit, Project, SubmitMode};

use crate::input;

/// Rule set to apply
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Full validation, stored as a purchase
    Submit,
    /// Minimal validation, stored as a draft
    Draft,
}

impl From<Mode> for SubmitMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Submit => SubmitMode::Submit,
            Mode::Draft => SubmitMode::Draft,
        }
    }
}

/// Arguments for project validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON or YAML project file
    #[arg(long)]
    pub input: Option<String>,

    /// Rule set to check against
    #[arg(long, value_enum, default_value = "submit")]
    pub mode: Mode,
}

/// Arguments for building a storage payload
#[derive(Args)]
pub struct PrepareArgs {
    /// Path to a JSON or YAML project file
    #[arg(long)]
    pub input: Option<String>,

    /// Rule set that must pass before the payload is produced
    #[arg(long, value_enum, default_value = "submit")]
    pub mode: Mode,
}

/// Arguments for the history digest
#[derive(Args)]
pub struct HistoryArgs {
    /// Path to a JSON or YAML file holding an array of projects
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let project: Project = input::load(args.input.as_deref(), "project validation")?;
    let outcome = match args.mode {
        Mode::Submit => validate_submit(&project),
        Mode::Draft => validate_draft(&project),
    };

    let mode = SubmitMode::from(args.mode);
    Ok(match outcome {
        Ok(()) => json!({ "valid": true, "mode": mode }),
        Err(failure) => json!({
            "valid": false,
            "mode": mode,
            "field": failure.field,
            "message": failure.message,
        }),
    })
}

pub fn run_prepare(args: PrepareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let project: Project = input::load(args.input.as_deref(), "submission payload")?;
    let submission = prepare_submission(&project, args.mode.into())?;
    Ok(serde_json::to_value(submission)?)
}

pub fn run_history(args: HistoryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let projects: Vec<Project> = input::load(args.input.as_deref(), "project history")?;
    let entries: Vec<HistoryEntry> = projects.iter().map(HistoryEntry::from_project).collect();
    Ok(serde_json::to_value(entries)?)
}
