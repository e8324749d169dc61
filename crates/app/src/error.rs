use stockroom_client::ApiError;
use stockroom_core::forms::FieldErrors;
use stockroom_core::CoreError;

use crate::config::ConfigError;

/// Application-level error type for workflows.
///
/// Wraps [`CoreError`] and [`ApiError`] and adds the outcomes a view needs
/// to render differently: inline field errors and blocked relocations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `stockroom_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backend call failed. The optimistic change was rolled back.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The form did not validate; no request was sent.
    #[error("Invalid form: {0}")]
    Invalid(FieldErrors),

    /// Required company data is missing; no request was sent.
    #[error("Blocked: {}", .0.join("; "))]
    Blocked(Vec<String>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Convenience type alias for workflow return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Text for an alert banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Core(CoreError::NotFound { entity, .. }) => format!("The {entity} no longer exists."),
            Self::Core(CoreError::Validation(msg)) | Self::Core(CoreError::Conflict(msg)) => msg.clone(),
            Self::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "Internal core error");
                "An internal error occurred".to_string()
            }
            Self::Invalid(_) => "Please fix the highlighted fields.".to_string(),
            Self::Blocked(messages) => messages.join("\n"),
            Self::Config(e) => e.to_string(),
        }
    }
}
