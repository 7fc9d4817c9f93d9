use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `aiModel` value the backend uses for user-authored messages.
pub const USER_AUTHOR: &str = "user";

// ── Messages ──────────────────────────────────────────────────────────────────

/// Performance data attached to a model-authored message.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetrics {
    pub response_time_ms: u64,
    pub word_count: u32,
    pub tokens_per_second: f64,
}

/// Who wrote a message: the user, or one specific model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Author {
    User,
    Model(String),
}

impl Author {
    pub fn is_user(&self) -> bool {
        matches!(self, Author::User)
    }

    pub fn model_id(&self) -> Option<&str> {
        match self {
            Author::User => None,
            Author::Model(id) => Some(id),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Author::User => USER_AUTHOR,
            Author::Model(id) => id,
        }
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MessageWire", into = "MessageWire")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub metrics: Option<ResponseMetrics>,
}

impl Message {
    /// A user-authored message. Never carries metrics.
    pub fn user(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            author: Author::User,
            content: content.into(),
            timestamp: Utc::now(),
            metrics: None,
        }
    }

    /// A model-authored message carrying its response metrics.
    pub fn from_model(
        conversation_id: impl Into<String>,
        model_id: impl Into<String>,
        content: impl Into<String>,
        metrics: ResponseMetrics,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            author: Author::Model(model_id.into()),
            content: content.into(),
            timestamp: Utc::now(),
            metrics: Some(metrics),
        }
    }

    pub fn is_user(&self) -> bool {
        self.author.is_user()
    }
}

/// JSON shape shared with the backend: `{id, content, aiModel, conversationId,
/// timestamp, isUser?, metrics?}`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageWire {
    id: String,
    content: String,
    ai_model: String,
    conversation_id: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metrics: Option<ResponseMetrics>,
}

impl From<MessageWire> for Message {
    fn from(wire: MessageWire) -> Self {
        let author = if wire.is_user || wire.ai_model == USER_AUTHOR {
            Author::User
        } else {
            Author::Model(wire.ai_model)
        };
        let metrics = if author.is_user() { None } else { wire.metrics };
        Self {
            id: wire.id,
            conversation_id: wire.conversation_id,
            author,
            content: wire.content,
            timestamp: wire.timestamp,
            metrics,
        }
    }
}

impl From<Message> for MessageWire {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            is_user: message.author.is_user(),
            ai_model: message.author.as_str().to_string(),
            conversation_id: message.conversation_id,
            timestamp: message.timestamp,
            metrics: message.metrics,
        }
    }
}

// ── Conversations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub ai_model: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: String, ai_model: String) -> Self {
        let now = Utc::now();
        Self { id, ai_model, messages: Vec::new(), created_at: now, updated_at: now }
    }

    /// Appends a message; `updated_at` never moves backwards.
    pub fn push(&mut self, message: Message) {
        let stamp = message.timestamp.max(Utc::now());
        self.updated_at = self.updated_at.max(stamp);
        self.messages.push(message);
    }

    /// First user message, used as the conversation's title.
    pub fn title(&self) -> Option<&str> {
        self.messages.iter().find(|m| m.is_user()).map(|m| m.content.as_str())
    }
}

// ── Chat API payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub ai_model: String,
    pub message: String,
    #[serde(default)]
    pub is_expert_advice: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    #[serde(default)]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub ai_model: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub metrics: Option<ResponseMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub ai_model: String,
}

// ── Auth ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub credits: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// `{token, email, fullName, isPremium, credits}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserProfile,
}

// ── Analytics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelStat {
    pub model_id: String,
    pub display_name: String,
    pub avg_response_time: f64,
    pub avg_word_count: f64,
    pub avg_tokens_per_second: f64,
    pub message_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayMetrics {
    pub date: String,
    pub message_count: u64,
    pub avg_response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalAnalytics {
    pub model_stats: Vec<ModelStat>,
    pub activity_trend: Vec<DayMetrics>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageTrend {
    pub date: String,
    pub model_counts: BTreeMap<String, u64>,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalLeaderboard {
    pub top_by_speed: Vec<ModelStat>,
    pub top_by_volume: Vec<ModelStat>,
    pub top_by_efficiency: Vec<ModelStat>,
    pub usage_trends: Vec<UsageTrend>,
}

// ── Prompt optimization ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PromptAnalysisRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptAnalysis {
    pub score: u8,
    pub critique: String,
    pub optimized_prompt: String,
    pub can_improve: bool,
}

// ── Feedback ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Suggestion,
    Query,
    Bug,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Suggestion => "suggestion",
            FeedbackKind::Query => "query",
            FeedbackKind::Bug => "bug",
        }
    }
}

impl std::str::FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suggestion" => Ok(FeedbackKind::Suggestion),
            "query" => Ok(FeedbackKind::Query),
            "bug" => Ok(FeedbackKind::Bug),
            other => Err(format!("Unknown feedback type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub contact_info: String,
}

// ── Preferences ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("Unknown theme: {other}")),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

/// Lenient timestamp parsing: the backend emits both RFC 3339 strings and
/// zone-less local date-times, the latter are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
