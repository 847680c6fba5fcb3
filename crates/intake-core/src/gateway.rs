use intake_domain::{CasePayload, CaseReceipt, CaseRecord, FieldKey};
use thiserror::Error;
use uuid::Uuid;

use crate::CoreError;

/// Failure modes of a case-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Could not reach the case service: {0}")]
    Network(String),
    #[error("The case service rejected {} field(s)", .0.len())]
    Rejected(Vec<(FieldKey, String)>),
    #[error("Unexpected case service failure: {0}")]
    Unexpected(String),
}

impl SubmissionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionError::Network(_))
    }

    /// Message shown above the review screen.
    pub fn banner(&self) -> &'static str {
        match self {
            SubmissionError::Network(_) => {
                "We couldn't submit your request. Check your connection and please try again."
            }
            SubmissionError::Rejected(_) => {
                "Some of your answers need attention before we can submit your request."
            }
            SubmissionError::Unexpected(_) => {
                "Something went wrong while submitting your request."
            }
        }
    }
}

/// Case-creation endpoint.
pub trait CaseGateway: Send + Sync {
    fn create_case(&self, payload: &CasePayload) -> Result<CaseReceipt, SubmissionError>;
}

/// Read side of the case service.
pub trait CaseRepository: Send + Sync {
    /// Every stored case, newest first.
    fn list_cases(&self) -> Result<Vec<CaseRecord>, CoreError>;
    fn load_case(&self, id: Uuid) -> Result<CaseRecord, CoreError>;

    /// Resolves a full id or a unique id prefix.
    fn find_case(&self, reference: &str) -> Result<CaseRecord, CoreError> {
        let needle = reference.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return self.load_case(id);
        }
        if needle.is_empty() {
            return Err(CoreError::CaseNotFound(reference.to_string()));
        }
        let mut matches = self
            .list_cases()?
            .into_iter()
            .filter(|record| record.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(CoreError::AmbiguousCase(reference.to_string())),
            (None, _) => Err(CoreError::CaseNotFound(reference.to_string())),
        }
    }
}
