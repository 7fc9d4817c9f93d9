use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::api::ChatBackend;
use crate::errors::AppError;
use crate::models::{
    AuthResponse, Conversation, CreateConversationRequest, FeedbackRequest, GlobalLeaderboard,
    LoginRequest, PersonalAnalytics, PromptAnalysis, PromptAnalysisRequest, SendMessageRequest,
    SendMessageResponse, SignupRequest, UserProfile,
};
use crate::store::AuthStore;

/// Thin authenticated wrapper around the backend REST API.
///
/// The bearer token is read from the [`AuthStore`] on every request, so a
/// login or logout takes effect immediately. No retries are attempted.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthStore,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, auth: AuthStore) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match self.auth.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = check_status(builder.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Parse(format!("Unexpected response body: {e}")))
    }

    async fn execute_empty(&self, builder: RequestBuilder) -> Result<(), AppError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }

    // ── Chat ──────────────────────────────────────────────────────────────────

    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, AppError> {
        self.execute(self.request(Method::POST, "/chat/send").json(request)).await
    }

    /// Creates a conversation remotely. The backend may answer with an empty
    /// body, in which case `None` is returned.
    pub async fn create_conversation(&self, ai_model: &str) -> Result<Option<Conversation>, AppError> {
        let body = CreateConversationRequest { ai_model: ai_model.to_string() };
        let response = check_status(
            self.request(Method::POST, "/conversations").json(&body).send().await?,
        )
        .await?;
        let text = response.text().await?;
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Conversation, AppError> {
        self.execute(self.request(Method::GET, &format!("/conversations/{id}"))).await
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, AppError> {
        self.execute(self.request(Method::GET, "/conversations")).await
    }

    pub async fn delete_conversation(&self, id: &str) -> Result<(), AppError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/conversations/{id}"))).await
    }

    // ── Analytics ─────────────────────────────────────────────────────────────

    pub async fn personal_analytics(&self) -> Result<PersonalAnalytics, AppError> {
        self.execute(self.request(Method::GET, "/analytics/personal")).await
    }

    pub async fn leaderboard(&self) -> Result<GlobalLeaderboard, AppError> {
        self.execute(self.request(Method::GET, "/analytics/leaderboard")).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────────

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.execute(self.request(Method::POST, "/auth/login").json(request)).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, AppError> {
        self.execute(self.request(Method::POST, "/auth/signup").json(request)).await
    }

    pub async fn me(&self) -> Result<UserProfile, AppError> {
        self.execute(self.request(Method::GET, "/auth/me")).await
    }

    // ── Prompt & feedback ─────────────────────────────────────────────────────

    pub async fn analyze_prompt(&self, prompt: &str) -> Result<PromptAnalysis, AppError> {
        let body = PromptAnalysisRequest { prompt: prompt.to_string() };
        self.execute(self.request(Method::POST, "/prompt/analyze").json(&body))
            .await
            .map_err(|e| match e {
                AppError::Server { status: 402, .. } => AppError::InsufficientCredits {
                    feature: "prompt optimization".to_string(),
                },
                other => other,
            })
    }

    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), AppError> {
        self.execute_empty(self.request(Method::POST, "/feedback").json(request)).await
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, AppError> {
        ApiClient::send_message(self, request).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(AppError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    let err = map_http_error(status, &body);
    error!("{err}");
    Err(err)
}

fn map_http_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    AppError::Server { status: status.as_u16(), message }
}
