mod common;

use std::sync::Arc;

use chatgrid::errors::AppError;
use chatgrid::models::{FeedbackKind, LoginRequest, SendMessageRequest, UserProfile};
use chatgrid::service::{support_service, AccountService, SupportService};
use chatgrid::storage::{MemoryStorage, Storage};
use chatgrid::store::auth_store::AUTH_STORAGE_KEY;
use chatgrid::store::{AuthStore, ChatStore};

fn signed_in() -> AuthStore {
    let auth = AuthStore::default();
    auth.set_token(common::TOKEN);
    auth
}

#[tokio::test]
async fn login_returns_token_and_profile() {
    let api = common::client(AuthStore::default()).await;
    let response = api
        .login(&LoginRequest { email: "ada@example.com".into(), password: "secret".into() })
        .await
        .unwrap();
    assert_eq!(response.token, common::TOKEN);
    assert_eq!(response.user.full_name, "Ada Lovelace");
    assert!(!response.user.is_premium);
}

#[tokio::test]
async fn bad_credentials_surface_server_message() {
    let api = common::client(AuthStore::default()).await;
    let err = api
        .login(&LoginRequest { email: "ada@example.com".into(), password: "nope".into() })
        .await
        .unwrap_err();
    match err {
        AppError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let api = common::client(AuthStore::default()).await;
    let err = api.me().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
}

#[tokio::test]
async fn token_is_read_on_every_request() {
    let auth = AuthStore::default();
    let api = common::client(auth.clone()).await;
    assert!(api.me().await.is_err());

    auth.set_token(common::TOKEN);
    assert_eq!(api.me().await.unwrap().email, "ada@example.com");

    auth.logout();
    assert!(matches!(api.me().await, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn send_message_parses_response_and_metrics() {
    let api = common::client(signed_in()).await;
    let response = api
        .send_message(&SendMessageRequest {
            conversation_id: "c1".into(),
            ai_model: "gpt5".into(),
            message: "Explain recursion".into(),
            is_expert_advice: false,
        })
        .await
        .unwrap();
    assert_eq!(response.content, "gpt5 says: Explain recursion");
    assert_eq!(response.conversation_id, "c1");
    let metrics = response.metrics.unwrap();
    assert_eq!(metrics.response_time_ms, 400);
    assert_eq!(metrics.word_count, 50);
}

#[tokio::test]
async fn upstream_failure_maps_to_server_error() {
    let api = common::client(signed_in()).await;
    let err = api
        .send_message(&SendMessageRequest {
            conversation_id: "c1".into(),
            ai_model: "broken".into(),
            message: "hi".into(),
            is_expert_advice: false,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Server error (502): upstream down");
}

#[tokio::test]
async fn create_conversation_tolerates_empty_body() {
    let api = common::client(signed_in()).await;
    let created = api.create_conversation("gpt5").await.unwrap().unwrap();
    assert_eq!(created.id, "remote-1");
    assert_eq!(created.ai_model, "gpt5");
    assert!(api.create_conversation("grok").await.unwrap().is_none());
}

#[tokio::test]
async fn remote_conversation_reads_mixed_timestamps() {
    let api = common::client(signed_in()).await;
    let conv = api.get_conversation("remote-1").await.unwrap();
    assert_eq!(conv.messages.len(), 2);
    assert!(conv.messages[0].is_user());
    assert_eq!(conv.messages[1].author.model_id(), Some("gpt5"));
    assert!(conv.messages[0].timestamp < conv.messages[1].timestamp);
    assert_eq!(conv.title(), Some("hi"));

    let err = api.get_conversation("missing").await.unwrap_err();
    assert!(err.is_not_found());

    api.delete_conversation("remote-1").await.unwrap();
}

#[tokio::test]
async fn oauth_callback_stores_session_only_on_success() {
    let auth = AuthStore::new(Arc::new(MemoryStorage::new()));
    let api = common::client(auth.clone()).await;
    let account = AccountService::new(api, auth.clone(), ChatStore::new());

    assert!(account.complete_oauth_callback("forged").await.is_err());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.token(), None);

    let user = account.complete_oauth_callback(common::TOKEN).await.unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert!(auth.is_authenticated());
    assert_eq!(auth.user(), Some(user));
}

#[tokio::test]
async fn optimizer_requires_premium_then_maps_402() {
    let auth = signed_in();
    let api = common::client(auth.clone()).await;
    let support = SupportService::new(api, auth.clone());

    let err = support.optimize_prompt("Explain recursion").await.unwrap_err();
    assert!(matches!(err, AppError::PremiumRequired { .. }));

    auth.set_auth(
        common::TOKEN,
        UserProfile {
            email: "ada@example.com".into(),
            full_name: "Ada".into(),
            is_premium: true,
            credits: 5,
        },
    );
    let analysis = support.optimize_prompt("Explain recursion").await.unwrap();
    assert!(analysis.can_improve);
    assert_eq!(analysis.optimized_prompt, "Explain in detail: Explain recursion");

    let err = support.optimize_prompt("expensive prompt").await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientCredits { .. }));
}

#[tokio::test]
async fn feedback_is_sent_with_type_key() {
    let api = common::client(AuthStore::default()).await;
    let request =
        support_service::feedback_request("Crashes on send", FeedbackKind::Bug, None).unwrap();
    api.submit_feedback(&request).await.unwrap();

    let request =
        support_service::feedback_request("Nice app", FeedbackKind::Suggestion, None).unwrap();
    let err = api.submit_feedback(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Server { status: 422, .. }));
}

fn premium_profile() -> UserProfile {
    UserProfile {
        email: "ada@example.com".into(),
        full_name: "Ada".into(),
        is_premium: true,
        credits: 100,
    }
}

fn selection(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[tokio::test]
async fn rejected_token_forces_logout_and_prunes_expert_models() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let auth = AuthStore::new(storage.clone());
    auth.set_auth("forged", premium_profile());
    assert!(storage.get(AUTH_STORAGE_KEY).unwrap().is_some());

    let chats = ChatStore::new();
    chats.set_selected_models(selection(&["gemini", "grok"]));
    let api = common::client(auth.clone()).await;
    let account = AccountService::new(api.clone(), auth.clone(), chats.clone());

    let result = account.guard(api.me().await);
    assert!(matches!(result, Err(AppError::Unauthorized)));
    assert!(!auth.is_authenticated());
    assert_eq!(auth.token(), None);
    assert_eq!(storage.get(AUTH_STORAGE_KEY).unwrap(), None);
    assert_eq!(chats.selected_models(), selection(&["grok"]));
}

#[tokio::test]
async fn guard_passes_other_errors_through_without_logout() {
    let auth = signed_in();
    let chats = ChatStore::new();
    let api = common::client(auth.clone()).await;
    let account = AccountService::new(api.clone(), auth.clone(), chats);

    let err = account.guard(api.get_conversation("missing").await).unwrap_err();
    assert!(err.is_not_found());
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn free_login_prunes_persisted_expert_selection() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    ChatStore::with_storage(storage.clone())
        .set_selected_models(selection(&["gemini", "deepseek", "grok"]));

    let chats = ChatStore::with_storage(storage.clone());
    assert_eq!(chats.selected_models(), selection(&["gemini", "deepseek", "grok"]));

    let auth = AuthStore::new(storage.clone());
    let api = common::client(auth.clone()).await;
    let account = AccountService::new(api, auth.clone(), chats.clone());

    let user = account.login("ada@example.com", "secret").await.unwrap();
    assert!(!user.is_premium);
    assert!(auth.is_authenticated());
    assert_eq!(chats.selected_models(), selection(&["grok"]));
    assert_eq!(ChatStore::with_storage(storage).selected_models(), selection(&["grok"]));
}

#[tokio::test]
async fn logout_falls_back_to_default_model_when_only_experts_remain() {
    let auth = AuthStore::default();
    auth.set_auth(common::TOKEN, premium_profile());
    let chats = ChatStore::new();
    chats.set_selected_models(selection(&["gemini", "deepseek"]));
    let api = common::client(auth.clone()).await;
    let account = AccountService::new(api, auth.clone(), chats.clone());

    account.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(chats.selected_models(), selection(&["gpt5"]));
}
