mod account;
mod chat;
mod insights;
mod render;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use chatgrid::api::ApiClient;
use chatgrid::config::Config;
use chatgrid::errors::AppError;
use chatgrid::service::{AccountService, Dispatcher, SupportService};
use chatgrid::storage::{FileStorage, Storage};
use chatgrid::store::{AuthStore, ChatStore};

use crate::{Command, RemoteAction};

/// Everything a command needs, wired once per invocation.
pub struct App {
    pub chats: ChatStore,
    pub auth: AuthStore,
    pub api: ApiClient,
    pub dispatcher: Dispatcher,
    pub account: AccountService,
    pub support: SupportService,
}

impl App {
    pub fn build(config: Config) -> Result<Self> {
        debug!("Using data directory {}", config.data_dir.display());
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.data_dir)?);

        let chats = ChatStore::with_storage(storage.clone());
        let auth = AuthStore::new(storage);
        let api = ApiClient::new(&config.api_url, config.http_timeout, auth.clone())?;
        let dispatcher = Dispatcher::new(chats.clone(), Arc::new(api.clone()));
        let account = AccountService::new(api.clone(), auth.clone(), chats.clone());
        let support = SupportService::new(api.clone(), auth.clone());

        Ok(Self { chats, auth, api, dispatcher, account, support })
    }

    /// Protected commands need a session.
    pub fn require_login(&self) -> Result<(), AppError> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn run(app: &App, command: Command) -> Result<()> {
    let result = match command {
        Command::Login { email, password } => account::login(app, &email, &password).await,
        Command::Signup { email, password, name } => {
            account::signup(app, &email, &password, &name).await
        }
        Command::OauthCallback { token } => account::oauth_callback(app, &token).await,
        Command::Logout => account::logout(app),
        Command::Whoami { refresh } => account::whoami(app, refresh).await,
        Command::Upgrade => account::upgrade(app),

        Command::Models => chat::models(app),
        Command::Select { models } => chat::select(app, &models),
        Command::Toggle { model } => chat::toggle(app, &model),
        Command::Send { message, expert } => chat::send(app, &message.join(" "), expert).await,
        Command::New { model } => chat::new_conversation(app, model.as_deref()),
        Command::Use { id } => chat::use_conversation(app, &id),
        Command::History => chat::history(app),
        Command::Show { id } => chat::show(app, id.as_deref()),
        Command::Clear { id, all } => chat::clear(app, id.as_deref(), all),
        Command::Theme { theme } => chat::theme(app, theme.as_deref()),

        Command::Remote { action } => match action {
            RemoteAction::List => insights::remote_list(app).await,
            RemoteAction::Show { id } => insights::remote_show(app, &id).await,
            RemoteAction::Create { model } => insights::remote_create(app, &model).await,
            RemoteAction::Delete { id } => insights::remote_delete(app, &id).await,
        },
        Command::Analytics => insights::analytics(app).await,
        Command::Leaderboard => insights::leaderboard(app).await,
        Command::Optimize { prompt } => insights::optimize(app, &prompt.join(" ")).await,
        Command::Score { prompt } => insights::score(&prompt.join(" ")),
        Command::Feedback { content, kind, contact } => {
            insights::feedback(app, &content, &kind, contact.as_deref()).await
        }
    };

    match result {
        Err(AppError::Unauthorized) => {
            anyhow::bail!("Not signed in or session expired. Run `chatgrid login <email>` first.")
        }
        other => Ok(other?),
    }
}
