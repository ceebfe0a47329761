use serde::Serialize;

use crate::error::AppError;

/// Result of a mutating file operation. `PartialSuccess` is specific to
/// cross-volume moves: the copy landed but the source could not be deleted,
/// so both paths exist on disk and the user may need to clean up manually.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    Success {
        message: String,
    },
    PartialSuccess {
        message: String,
        destination: String,
        source: String,
    },
    Failure {
        error: AppError,
    },
}

impl OperationOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Success { message } | Self::PartialSuccess { message, .. } => message.clone(),
            Self::Failure { error } => error.to_string(),
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Failure { error } => Some(error),
            _ => None,
        }
    }
}

impl From<Result<String, AppError>> for OperationOutcome {
    fn from(result: Result<String, AppError>) -> Self {
        match result {
            Ok(message) => Self::Success { message },
            Err(error) => Self::Failure { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_result() {
        let ok: OperationOutcome = Ok("done".to_string()).into();
        assert!(ok.is_success());
        assert_eq!(ok.message(), "done");

        let err: OperationOutcome = Err(AppError::NotFound("x".into())).into();
        assert!(err.is_failure());
        assert!(matches!(err.error(), Some(AppError::NotFound(_))));
    }

    #[test]
    fn partial_success_is_neither_success_nor_failure() {
        let partial = OperationOutcome::PartialSuccess {
            message: "copied but not deleted".into(),
            destination: "/b/f".into(),
            source: "/a/f".into(),
        };
        assert!(!partial.is_success());
        assert!(!partial.is_failure());
    }
}
