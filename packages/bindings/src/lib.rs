use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use dealer_core::project::HistoryEntry;
use dealer_core::{DealInput, NumericField, Project, SubmitMode};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_mode(mode: Option<String>) -> NapiResult<SubmitMode> {
    match mode.as_deref() {
        None | Some("submit") => Ok(SubmitMode::Submit),
        Some("draft") => Ok(SubmitMode::Draft),
        Some(other) => Err(to_napi_error(format!(
            "unknown mode '{other}', expected 'submit' or 'draft'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

/// Summary wrapped in the computation envelope (warnings, timing).
#[napi]
pub fn analyse_deal(input_json: String) -> NapiResult<String> {
    let input = DealInput::from_json(&input_json).map_err(to_napi_error)?;
    let output = dealer_core::analyse_deal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Bare summary, recomputed on every form edit.
#[napi]
pub fn build_deal_summary(input_json: String) -> NapiResult<String> {
    let input = DealInput::from_json(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&dealer_core::build(&input)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_project(input_json: String, mode: Option<String>) -> NapiResult<String> {
    let project: Project = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let outcome = match parse_mode(mode)? {
        SubmitMode::Submit => dealer_core::validate_submit(&project),
        SubmitMode::Draft => dealer_core::validate_draft(&project),
    };
    let value = match outcome {
        Ok(()) => json!({ "valid": true }),
        Err(failure) => json!({
            "valid": false,
            "field": failure.field,
            "message": failure.message,
        }),
    };
    Ok(value.to_string())
}

#[napi]
pub fn prepare_submission(input_json: String, mode: Option<String>) -> NapiResult<String> {
    let project: Project = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let submission =
        dealer_core::prepare_submission(&project, parse_mode(mode)?).map_err(to_napi_error)?;
    serde_json::to_string(&submission).map_err(to_napi_error)
}

#[napi]
pub fn project_history(input_json: String) -> NapiResult<String> {
    let projects: Vec<Project> = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let entries: Vec<HistoryEntry> = projects.iter().map(HistoryEntry::from_project).collect();
    serde_json::to_string(&entries).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// Apply a keystroke-level edit to a numeric field. `previous_json` is the
/// field's current serialised value (`null`, a partial token, or a decimal).
#[napi]
pub fn normalize_value(raw: String, previous_json: Option<String>) -> NapiResult<String> {
    let previous: NumericField = match previous_json {
        Some(p) => serde_json::from_str(&p).map_err(to_napi_error)?,
        None => NumericField::Empty,
    };
    let field = previous.edit(&raw);
    let value = json!({
        "accepted": NumericField::parse(&raw).is_some(),
        "field": field,
        "computesAs": field.value(),
        "present": field.is_present(),
    });
    Ok(value.to_string())
}
