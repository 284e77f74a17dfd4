pub mod deal;
pub mod display;
pub mod error;
pub mod normalize;
pub mod project;
pub mod types;
pub mod validation;

pub use deal::{analyse_deal, build, DealInput, DealSummary};
pub use error::DealerError;
pub use normalize::NumericField;
pub use project::{prepare_submission, Project, ProjectSubmission, ProjectType, SubmitMode};
pub use types::*;
pub use validation::{validate_draft, validate_submit, ValidationFailure};

/// Standard result type for all dealer operations
pub type DealerResult<T> = Result<T, DealerError>;
