use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::{Conversation, Message, Theme};
use crate::registry;
use crate::storage::{self, Storage};

/// Storage key for the persisted conversation state.
pub const CHAT_STORAGE_KEY: &str = "chat-storage";

/// Everything the chat surfaces read. Loading and error flags are transient
/// and never written to storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatState {
    pub conversations: HashMap<String, Conversation>,
    pub current_conversation_id: Option<String>,
    pub selected_models: Vec<String>,
    #[serde(skip)]
    pub loading: HashMap<String, bool>,
    #[serde(skip)]
    pub errors: HashMap<String, String>,
    pub theme: Theme,
    pub is_sidebar_open: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            conversations: HashMap::new(),
            current_conversation_id: None,
            selected_models: vec![registry::default_model(false).id.to_string()],
            loading: HashMap::new(),
            errors: HashMap::new(),
            theme: Theme::default(),
            is_sidebar_open: false,
        }
    }
}

/// Shared conversation state container.
///
/// Cloning yields another handle to the same state. Every mutation is a short
/// synchronous critical section; the lock is never held across an `.await`.
#[derive(Clone)]
pub struct ChatStore {
    state: Arc<Mutex<ChatState>>,
    storage: Option<Arc<dyn Storage>>,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatStore {
    /// A fresh, purely in-memory store.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(ChatState::default())), storage: None }
    }

    /// A store that reloads its durable state from `storage` and writes it
    /// back after every durable mutation.
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        let mut state: ChatState =
            storage::load_json(storage.as_ref(), CHAT_STORAGE_KEY).unwrap_or_default();
        if state
            .current_conversation_id
            .as_ref()
            .is_some_and(|id| !state.conversations.contains_key(id))
        {
            state.current_conversation_id = None;
        }
        debug!("Loaded {} conversations from storage", state.conversations.len());
        Self { state: Arc::new(Mutex::new(state)), storage: Some(storage) }
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a durable mutation and persists the result.
    fn mutate<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut state);
            let snapshot = self.storage.as_ref().map(|_| state.clone());
            (result, snapshot)
        };
        if let (Some(storage), Some(snapshot)) = (&self.storage, snapshot) {
            if let Err(e) = storage::save_json(storage.as_ref(), CHAT_STORAGE_KEY, &snapshot) {
                warn!("Failed to persist chat state: {e}");
            }
        }
        result
    }

    /// Applies a mutation to transient state only.
    fn mutate_transient<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut self.lock())
    }

    /// A point-in-time copy of the whole state.
    pub fn snapshot(&self) -> ChatState {
        self.lock().clone()
    }

    // ── Conversations ────────────────────────────────────────────────────────

    /// Creates an empty conversation, makes it active and returns its id.
    pub fn create_conversation(&self, primary_model: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let conversation = Conversation::new(id.clone(), primary_model.to_string());
        self.mutate(|state| {
            state.conversations.insert(id.clone(), conversation);
            state.current_conversation_id = Some(id.clone());
        });
        debug!("Created conversation {id} for {primary_model}");
        id
    }

    /// Appends a user message to the active conversation, creating one
    /// seeded with the first selected model when none is active.
    pub fn add_user_message(&self, text: &str) -> Message {
        self.mutate(|state| {
            let id = match state.current_conversation_id.clone() {
                Some(id) if state.conversations.contains_key(&id) => id,
                _ => {
                    let primary = state
                        .selected_models
                        .first()
                        .cloned()
                        .unwrap_or_else(|| registry::default_model(false).id.to_string());
                    let id = uuid::Uuid::new_v4().to_string();
                    state
                        .conversations
                        .insert(id.clone(), Conversation::new(id.clone(), primary));
                    state.current_conversation_id = Some(id.clone());
                    id
                }
            };
            let message = Message::user(id.clone(), text);
            if let Some(conversation) = state.conversations.get_mut(&id) {
                conversation.push(message.clone());
            }
            message
        })
    }

    /// Appends `message` to the given conversation. Returns `false` (and
    /// changes nothing) when the conversation no longer exists.
    pub fn add_message(&self, conversation_id: &str, message: Message) -> bool {
        self.mutate(|state| match state.conversations.get_mut(conversation_id) {
            Some(conversation) => {
                conversation.push(message);
                true
            }
            None => {
                debug!("Dropping message for missing conversation {conversation_id}");
                false
            }
        })
    }

    pub fn clear_conversation(&self, id: &str) {
        self.mutate(|state| {
            state.conversations.remove(id);
            if state.current_conversation_id.as_deref() == Some(id) {
                state.current_conversation_id = None;
            }
        });
    }

    pub fn clear_all_conversations(&self) {
        self.mutate(|state| {
            state.conversations.clear();
            state.current_conversation_id = None;
        });
    }

    pub fn set_current_conversation(&self, id: &str) -> Result<(), AppError> {
        self.mutate(|state| {
            if !state.conversations.contains_key(id) {
                return Err(AppError::ConversationNotFound { id: id.to_string() });
            }
            state.current_conversation_id = Some(id.to_string());
            Ok(())
        })
    }

    pub fn current_conversation_id(&self) -> Option<String> {
        self.lock().current_conversation_id.clone()
    }

    pub fn active_conversation(&self) -> Option<Conversation> {
        let state = self.lock();
        let id = state.current_conversation_id.as_ref()?;
        state.conversations.get(id).cloned()
    }

    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.lock().conversations.get(id).cloned()
    }

    /// All conversations, most recently updated first.
    pub fn conversations_by_recency(&self) -> Vec<Conversation> {
        let mut list: Vec<Conversation> = self.lock().conversations.values().cloned().collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        list
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Replaces the selection. Callers keep it non-empty.
    pub fn set_selected_models(&self, ids: Vec<String>) {
        self.mutate(|state| state.selected_models = ids);
    }

    pub fn selected_models(&self) -> Vec<String> {
        self.lock().selected_models.clone()
    }

    // ── Per-model transient state ────────────────────────────────────────────

    pub fn set_loading(&self, model_id: &str, flag: bool) {
        self.mutate_transient(|state| {
            if flag {
                state.loading.insert(model_id.to_string(), true);
            } else {
                state.loading.remove(model_id);
            }
        });
    }

    pub fn set_error(&self, model_id: &str, error: Option<String>) {
        self.mutate_transient(|state| match error {
            Some(e) => {
                state.errors.insert(model_id.to_string(), e);
            }
            None => {
                state.errors.remove(model_id);
            }
        });
    }

    /// Drops every loading flag at once.
    pub fn clear_loading(&self) {
        self.mutate_transient(|state| state.loading.clear());
    }

    pub fn is_loading(&self, model_id: &str) -> bool {
        self.lock().loading.get(model_id).copied().unwrap_or(false)
    }

    pub fn any_loading(&self) -> bool {
        self.lock().loading.values().any(|flag| *flag)
    }

    pub fn error(&self, model_id: &str) -> Option<String> {
        self.lock().errors.get(model_id).cloned()
    }

    // ── Preferences ──────────────────────────────────────────────────────────

    pub fn set_theme(&self, theme: Theme) {
        self.mutate(|state| state.theme = theme);
    }

    pub fn theme(&self) -> Theme {
        self.lock().theme
    }

    pub fn toggle_sidebar(&self) -> bool {
        self.mutate(|state| {
            state.is_sidebar_open = !state.is_sidebar_open;
            state.is_sidebar_open
        })
    }
}
