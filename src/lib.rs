//! Client library for the multi-model AI chat comparison service: a model
//! registry, conversation and auth stores, an HTTP gateway to the backend,
//! and the fan-out that sends one prompt to many models at once.

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod prompt;
pub mod registry;
pub mod service;
pub mod storage;
pub mod store;

pub use errors::AppError;
