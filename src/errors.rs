use thiserror::Error;

/// Top-level client error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Transport errors ─────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    // ── Authentication errors ────────────────────────────────────────────────
    #[error("Not authenticated or session expired")]
    Unauthorized,

    #[error("'{feature}' requires an Expert-tier subscription")]
    PremiumRequired { feature: String },

    #[error("Insufficient credits for '{feature}'")]
    InsufficientCredits { feature: String },

    // ── Upstream errors ──────────────────────────────────────────────────────
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' is too short (minimum {min_length} characters)")]
    FieldTooShort { field_name: String, min_length: usize },

    #[error("No model selected")]
    NoModelSelected,

    #[error("A message is already being sent")]
    SendInProgress,

    #[error("At least one model must stay selected")]
    LastModelSelected,

    #[error("Unknown model '{model_id}'")]
    UnknownModel { model_id: String },

    #[error("Invalid value '{value}' for {field_name}")]
    InvalidValue { field_name: String, value: String },

    // ── Local state errors ───────────────────────────────────────────────────
    #[error("Conversation '{id}' not found")]
    ConversationNotFound { id: String },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage { message: message.into(), source: Some(source) }
    }

    pub fn empty_field(field_name: impl Into<String>) -> Self {
        AppError::EmptyField { field_name: field_name.into() }
    }

    pub fn premium_required(feature: impl Into<String>) -> Self {
        AppError::PremiumRequired { feature: feature.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::EmptyField { .. }
                | AppError::FieldTooShort { .. }
                | AppError::NoModelSelected
                | AppError::SendInProgress
                | AppError::LastModelSelected
                | AppError::UnknownModel { .. }
                | AppError::InvalidValue { .. }
        )
    }

    /// True when the caller should drop the session and re-authenticate.
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Timeout(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ConversationNotFound { .. } | AppError::Server { status: 404, .. }
        )
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::Parse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}
