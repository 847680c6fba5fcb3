use intake_domain::{FieldKey, ParseValueError};
use thiserror::Error;

use crate::{gateway::SubmissionError, validation::FormErrors};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(FormErrors),
    #[error("Field `{key}` does not accept {action}")]
    SlotMismatch {
        key: FieldKey,
        action: &'static str,
    },
    #[error("Field `{0}` needs a non-empty value")]
    BlankValue(FieldKey),
    #[error(transparent)]
    InvalidChoice(#[from] ParseValueError),
    #[error("Cannot {action} while on {step}")]
    InvalidTransition {
        step: String,
        action: &'static str,
    },
    #[error("No request category selected")]
    NoCategory,
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("Intake session has been closed")]
    SessionClosed,
    #[error("Case not found: {0}")]
    CaseNotFound(String),
    #[error("Case reference `{0}` matches more than one case")]
    AmbiguousCase(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}
