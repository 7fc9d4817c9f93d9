pub mod auth_store;
pub mod chat_store;

pub use auth_store::{AuthSession, AuthStore};
pub use chat_store::{ChatState, ChatStore};
