use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::api::ChatBackend;
use crate::errors::AppError;
use crate::models::{Message, ResponseMetrics, SendMessageRequest};
use crate::store::ChatStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub expert_advice: bool,
}

impl SendOptions {
    /// Expert advice is an Expert-tier feature.
    pub fn with_expert_advice(is_premium: bool) -> Result<Self, AppError> {
        if !is_premium {
            return Err(AppError::premium_required("Expert Advice mode"));
        }
        Ok(Self { expert_advice: true })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Responded(Message),
    Failed {
        error: String,
        /// The backend rejected the session token.
        is_auth: bool,
    },
    /// The response arrived after `stop()` and was dropped.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    pub model_id: String,
    pub outcome: ModelOutcome,
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub conversation_id: String,
    pub user_message: Message,
    pub results: Vec<ModelResult>,
}

impl DispatchReport {
    pub fn responses(&self) -> impl Iterator<Item = &Message> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ModelOutcome::Responded(message) => Some(message),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ModelOutcome::Failed { error, .. } => Some((r.model_id.as_str(), error.as_str())),
            _ => None,
        })
    }

    /// True when any model's request failed because the session was rejected.
    pub fn session_rejected(&self) -> bool {
        self.results
            .iter()
            .any(|r| matches!(r.outcome, ModelOutcome::Failed { is_auth: true, .. }))
    }
}

/// Fans one user message out to every selected model.
///
/// Each model's request is an independent future; the batch is joined only to
/// know when the whole send has settled. A failure for one model never
/// cancels or fails its siblings.
#[derive(Clone)]
pub struct Dispatcher {
    store: ChatStore,
    backend: Arc<dyn ChatBackend>,
    sending: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl Dispatcher {
    pub fn new(store: ChatStore, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            store,
            backend,
            sending: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    pub async fn send(&self, text: &str, options: SendOptions) -> Result<DispatchReport, AppError> {
        // ── Validation ────────────────────────────────────────────────────────
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::empty_field("message"));
        }
        let models = self.store.selected_models();
        if models.is_empty() {
            return Err(AppError::NoModelSelected);
        }
        if self
            .sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::SendInProgress);
        }
        // read only once the flag is ours, so a concurrent stop() cannot
        // leave this send holding a stale generation
        let generation = self.generation.load(Ordering::Acquire);

        // ── Record the user turn once, creating the conversation if needed ────
        let user_message = self.store.add_user_message(text);
        let conversation_id = user_message.conversation_id.clone();
        info!(
            "Dispatching to {} model(s) in conversation {conversation_id}",
            models.len()
        );

        // ── Fan out; wait for every request to settle ─────────────────────────
        let requests = models.iter().map(|model_id| {
            self.dispatch_one(generation, &conversation_id, model_id, text, options)
        });
        let outcomes = join_all(requests).await;

        if !self.is_stale(generation) {
            self.sending.store(false, Ordering::Release);
        }

        let results = models
            .into_iter()
            .zip(outcomes)
            .map(|(model_id, outcome)| ModelResult { model_id, outcome })
            .collect();

        Ok(DispatchReport { conversation_id, user_message, results })
    }

    /// Clears every loading flag and the in-flight flag. Requests already on
    /// the wire keep running; their responses are discarded on arrival.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.sending.store(false, Ordering::Release);
        self.store.clear_loading();
        info!("Send stopped; late responses will be discarded");
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) != generation
    }

    async fn dispatch_one(
        &self,
        generation: u64,
        conversation_id: &str,
        model_id: &str,
        text: &str,
        options: SendOptions,
    ) -> ModelOutcome {
        self.store.set_loading(model_id, true);
        self.store.set_error(model_id, None);

        let request = SendMessageRequest {
            conversation_id: conversation_id.to_string(),
            ai_model: model_id.to_string(),
            message: text.to_string(),
            is_expert_advice: options.expert_advice,
        };
        let started = Instant::now();
        let result = self.backend.send_message(&request).await;
        let elapsed = started.elapsed();

        if self.is_stale(generation) {
            debug!("Discarding late response from {model_id} after stop");
            return ModelOutcome::Discarded;
        }

        let outcome = match result {
            Ok(response) => {
                let metrics = response
                    .metrics
                    .unwrap_or_else(|| ResponseMetrics::measure(elapsed, &response.content));
                let message =
                    Message::from_model(conversation_id, model_id, response.content, metrics);
                self.store.add_message(conversation_id, message.clone());
                debug!(
                    "{model_id} answered in {}ms ({} words)",
                    metrics.response_time_ms, metrics.word_count
                );
                ModelOutcome::Responded(message)
            }
            Err(e) => {
                warn!("Error sending message to {model_id}: {e}");
                let error = e.to_string();
                self.store.set_error(model_id, Some(error.clone()));
                ModelOutcome::Failed { error, is_auth: e.is_auth() }
            }
        };
        self.store.set_loading(model_id, false);
        outcome
    }
}
