//! Operation outcomes - structured results agents compose replies around.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of operation validation and execution.
///
/// These are business outcomes, not faults: they travel back to the
/// requesting agent as data inside an [`OperationOutcome`] and are surfaced
/// to the user only as composed natural-language explanations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum OperationError {
    /// The course id is unknown to the catalog.
    #[error("course '{course_id}' does not exist")]
    CourseNotFound { course_id: String },

    /// The user already owns the course.
    #[error("course '{course_id}' is already owned")]
    AlreadyOwned { course_id: String },

    /// The user does not own the course.
    #[error("course '{course_id}' is not owned, so it cannot be refunded")]
    NotOwned { course_id: String },

    /// Purchased more than the refund window ago.
    #[error("course '{course_id}' was purchased more than {window_days} days ago and is no longer eligible for a refund")]
    RefundWindowExpired { course_id: String, window_days: i64 },

    /// The requested operation name is not registered.
    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },

    /// The operation exists but is outside the requesting agent's scope.
    #[error("operation '{name}' is not available to the {agent} agent")]
    NotPermitted { agent: String, name: String },

    /// Arguments failed schema validation.
    #[error("invalid arguments for '{name}': {reason}")]
    InvalidArguments {
        name: String,
        #[serde(rename = "detail")]
        reason: String,
    },
}

/// Tagged result of an operation execution.
///
/// Always returned as data, never raised, so the invoking agent can compose
/// a reply around either variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    Success {
        operation: String,
        payload: serde_json::Value,
    },
    Error {
        operation: String,
        #[serde(flatten)]
        error: OperationError,
    },
}

impl OperationOutcome {
    /// Creates a success outcome.
    pub fn success(operation: impl Into<String>, payload: serde_json::Value) -> Self {
        OperationOutcome::Success {
            operation: operation.into(),
            payload,
        }
    }

    /// Creates an error outcome.
    pub fn failure(operation: impl Into<String>, error: OperationError) -> Self {
        OperationOutcome::Error {
            operation: operation.into(),
            error,
        }
    }

    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success { .. })
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &str {
        match self {
            OperationOutcome::Success { operation, .. } => operation,
            OperationOutcome::Error { operation, .. } => operation,
        }
    }

    /// Returns the error, if this is a failure.
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            OperationOutcome::Success { .. } => None,
            OperationOutcome::Error { error, .. } => Some(error),
        }
    }

    /// Renders the outcome as text handed back to the reasoning engine.
    pub fn render_for_agent(&self) -> String {
        match self {
            OperationOutcome::Success { operation, payload } => format!(
                "Operation '{}' succeeded with result: {}",
                operation,
                serde_json::to_string(payload).unwrap_or_else(|_| payload.to_string())
            ),
            OperationOutcome::Error { operation, error } => {
                format!("Operation '{}' failed: {}", operation, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_outcome_exposes_payload() {
        let outcome =
            OperationOutcome::success("purchase_course", serde_json::json!({ "price": 79 }));
        assert!(outcome.is_success());
        assert_eq!(outcome.operation(), "purchase_course");
        assert!(outcome.error().is_none());
    }

    #[test]
    fn failure_outcome_exposes_error() {
        let outcome = OperationOutcome::failure(
            "refund_course",
            OperationError::NotOwned {
                course_id: "ai_saas_builder".to_string(),
            },
        );
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.error(),
            Some(OperationError::NotOwned { .. })
        ));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = OperationOutcome::failure(
            "purchase_course",
            OperationError::AlreadyOwned {
                course_id: "x".to_string(),
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["reason"], "already_owned");
    }

    #[test]
    fn rendered_failure_names_operation_and_reason() {
        let outcome = OperationOutcome::failure(
            "refund_course",
            OperationError::RefundWindowExpired {
                course_id: "x".to_string(),
                window_days: 30,
            },
        );
        let rendered = outcome.render_for_agent();
        assert!(rendered.contains("refund_course"));
        assert!(rendered.contains("30 days"));
    }

    #[test]
    fn error_messages_are_user_composable() {
        let err = OperationError::UnknownOperation {
            name: "grant_discount".to_string(),
        };
        assert_eq!(err.to_string(), "unknown operation 'grant_discount'");
    }
}
