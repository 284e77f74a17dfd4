use clap::Args;
use serde_json::{json, Value};

use dealer_core::NumericField;

/// Arguments for normalising a form token
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct NormalizeArgs {
    /// Raw text as typed in the form, e.g. "1 250 000,50"
    pub value: String,

    /// Value the field held before this edit (kept if the token is rejected)
    #[arg(long)]
    pub previous: Option<String>,
}

pub fn run_normalize(args: NormalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let previous = match args.previous.as_deref() {
        Some(raw) => NumericField::parse(raw)
            .ok_or_else(|| format!("previous value '{raw}' is not a number"))?,
        None => NumericField::Empty,
    };

    let parsed = NumericField::parse(&args.value);
    let field = previous.edit(&args.value);
    let state = match &field {
        NumericField::Empty => "empty",
        NumericField::Incomplete(_) => "incomplete",
        NumericField::Value(_) => "value",
    };

    Ok(json!({
        "result": {
            "input": args.value,
            "accepted": parsed.is_some(),
            "state": state,
            "field": field,
            "computesAs": field.value(),
            "present": field.is_present(),
        }
    }))
}
