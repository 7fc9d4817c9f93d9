use tracing::info;

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{FeedbackKind, FeedbackRequest, PromptAnalysis};
use crate::prompt::MIN_OPTIMIZE_LEN;
use crate::store::AuthStore;

const MAX_FEEDBACK_LENGTH: usize = 2000;

/// Validates a feedback submission before it leaves the client.
pub fn feedback_request(
    content: &str,
    kind: FeedbackKind,
    contact_info: Option<&str>,
) -> Result<FeedbackRequest, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::empty_field("content"));
    }
    if content.chars().count() > MAX_FEEDBACK_LENGTH {
        return Err(AppError::InvalidValue {
            field_name: "content".to_string(),
            value: format!("{} characters (max {MAX_FEEDBACK_LENGTH})", content.chars().count()),
        });
    }
    Ok(FeedbackRequest {
        content: content.to_string(),
        kind,
        contact_info: contact_info.map(str::trim).unwrap_or_default().to_string(),
    })
}

/// Prompt optimization and feedback, the two in-page actions that surface
/// failures inline and stay re-submittable.
#[derive(Clone)]
pub struct SupportService {
    api: ApiClient,
    auth: AuthStore,
}

impl SupportService {
    pub fn new(api: ApiClient, auth: AuthStore) -> Self {
        Self { api, auth }
    }

    /// Rewrites a prompt via the backend optimizer (Expert tier only).
    pub async fn optimize_prompt(&self, prompt: &str) -> Result<PromptAnalysis, AppError> {
        let prompt = prompt.trim();
        if prompt.chars().count() < MIN_OPTIMIZE_LEN {
            return Err(AppError::FieldTooShort {
                field_name: "prompt".to_string(),
                min_length: MIN_OPTIMIZE_LEN,
            });
        }
        if !self.auth.is_premium() {
            return Err(AppError::premium_required("Master Rewrite"));
        }
        self.api.analyze_prompt(prompt).await
    }

    pub async fn submit_feedback(
        &self,
        content: &str,
        kind: FeedbackKind,
        contact_info: Option<&str>,
    ) -> Result<(), AppError> {
        let request = feedback_request(content, kind, contact_info)?;
        self.api.submit_feedback(&request).await?;
        info!("Feedback submitted ({})", kind.as_str());
        Ok(())
    }
}
