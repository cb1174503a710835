use thiserror::Error;

/// Broad failure categories that outer layers map onto their own
/// status codes (HTTP status, process exit code, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    NotFound,
    Internal,
}

#[derive(Debug, Error)]
pub enum AdvanceError {
    #[error("Invalid pay frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid loan parameters: {field} — {reason}")]
    InvalidLoanParameters { field: String, reason: String },

    #[error("Invalid loan term: {0} months (must be at least 1)")]
    InvalidTerm(i64),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid advance policy: {field} — {reason}")]
    PolicyInvalid { field: String, reason: String },

    #[error("Loan not found: {0}")]
    NotFound(String),

    #[error("Duplicate loan record: {0}")]
    DuplicateRecord(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AdvanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdvanceError::InvalidFrequency(_)
            | AdvanceError::InvalidLoanParameters { .. }
            | AdvanceError::InvalidTerm(_)
            | AdvanceError::InvalidInput { .. }
            | AdvanceError::PolicyInvalid { .. }
            | AdvanceError::SerializationError(_) => ErrorKind::ClientInput,
            AdvanceError::NotFound(_) => ErrorKind::NotFound,
            AdvanceError::DuplicateRecord(_) | AdvanceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to a caller. Internal faults are reported
    /// without detail.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    pub(crate) fn loan_param(field: &str, reason: impl Into<String>) -> Self {
        AdvanceError::InvalidLoanParameters {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AdvanceError {
    fn from(e: serde_json::Error) -> Self {
        AdvanceError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            AdvanceError::InvalidFrequency("Daily".into()).kind(),
            ErrorKind::ClientInput
        );
        assert_eq!(AdvanceError::InvalidTerm(0).kind(), ErrorKind::ClientInput);
        assert_eq!(AdvanceError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            AdvanceError::DuplicateRecord("x".into()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = AdvanceError::Internal("store lock poisoned".into());
        assert_eq!(err.public_message(), "Internal server error");

        let err = AdvanceError::InvalidFrequency("Daily".into());
        assert_eq!(err.public_message(), "Invalid pay frequency: Daily");
    }
}
