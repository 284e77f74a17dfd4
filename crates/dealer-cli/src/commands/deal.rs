use clap::Args;
use serde_json::Value;

use dealer_core::deal::{self, DealInput};

use crate::input;

/// Arguments for deal analysis
#[derive(Args)]
pub struct AnalyseArgs {
    /// Path to a JSON or YAML deal file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyse(args: AnalyseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal_input: DealInput = input::load(args.input.as_deref(), "deal analysis")?;
    let result = deal::analyse_deal(&deal_input)?;
    Ok(serde_json::to_value(result)?)
}
