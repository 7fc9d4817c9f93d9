pub mod client;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{SendMessageRequest, SendMessageResponse};

pub use client::ApiClient;

/// The one backend call the fan-out depends on.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, AppError>;
}
