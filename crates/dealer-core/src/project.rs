use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deal::{build, DealInput, DealSummary};
use crate::normalize::text_or_empty;
use crate::types::Money;
use crate::validation::{validate_draft, validate_submit, ValidationFailure};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Persistence state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Incomplete data allowed
    #[default]
    Draft,
    /// Fully validated deal
    Purchase,
}

/// A deal as stored by the project backend.
///
/// The engine never writes one back itself: callers read a project, edit its
/// [`DealInput`], and hand a [`ProjectSubmission`] to the storage service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub address: String,
    #[serde(rename = "type", default)]
    pub project_type: ProjectType,
    #[serde(flatten)]
    pub deal: DealInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: impl Into<String>, address: impl Into<String>, deal: DealInput) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            deal,
            ..Default::default()
        }
    }

    /// Only validated purchases can be rendered as a PDF report.
    pub fn can_generate_report(&self) -> bool {
        self.project_type == ProjectType::Purchase
    }
}

/// Which rule set gates the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    Submit,
    Draft,
}

impl SubmitMode {
    /// The project type stored when this mode's validation passes.
    pub fn project_type(&self) -> ProjectType {
        match self {
            SubmitMode::Submit => ProjectType::Purchase,
            SubmitMode::Draft => ProjectType::Draft,
        }
    }
}

/// What the storage service receives: the project, typed by the rule set it
/// passed, and the summary computed from its deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSubmission {
    pub project: Project,
    pub result: DealSummary,
}

/// Digest of a project for the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Option<String>,
    pub title: String,
    pub status: ProjectType,
    pub created_at: Option<DateTime<Utc>>,
    /// Input VAT carried by the expenses
    pub expense_vat: Money,
    /// Sum of lot resale prices
    pub gross_resale: Money,
    pub can_download: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a project under `mode` and build the payload to store.
///
/// The input project is left untouched; the returned copy carries the project
/// type matching the rule set that passed.
pub fn prepare_submission(
    project: &Project,
    mode: SubmitMode,
) -> Result<ProjectSubmission, ValidationFailure> {
    match mode {
        SubmitMode::Submit => validate_submit(project)?,
        SubmitMode::Draft => validate_draft(project)?,
    }

    let mut stored = project.clone();
    stored.project_type = mode.project_type();
    let result = build(&stored.deal);

    Ok(ProjectSubmission {
        project: stored,
        result,
    })
}

impl HistoryEntry {
    pub fn from_project(project: &Project) -> Self {
        let summary = build(&project.deal);
        Self {
            id: project.id.clone(),
            title: project.name.clone(),
            status: project.project_type,
            created_at: project.created_at,
            expense_vat: summary.total_expense_vat,
            gross_resale: summary.total_resale,
            can_download: project.can_generate_report(),
        }
    }
}
