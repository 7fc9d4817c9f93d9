pub mod account_service;
pub mod chat_service;
pub mod selection;
pub mod support_service;

pub use account_service::AccountService;
pub use chat_service::{DispatchReport, Dispatcher, ModelOutcome, ModelResult, SendOptions};
pub use support_service::SupportService;
