use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{LoginRequest, SignupRequest, UserProfile};
use crate::service::selection;
use crate::store::{AuthStore, ChatStore};

/// Login, signup, OAuth completion and session upkeep.
#[derive(Clone)]
pub struct AccountService {
    api: ApiClient,
    auth: AuthStore,
    chats: ChatStore,
}

impl AccountService {
    pub fn new(api: ApiClient, auth: AuthStore, chats: ChatStore) -> Self {
        Self { api, auth, chats }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        require("email", email)?;
        require("password", password)?;
        let request = LoginRequest { email: email.trim().to_string(), password: password.to_string() };
        let response = self.api.login(&request).await?;
        self.auth.set_auth(response.token, response.user.clone());
        selection::prune_ineligible(&self.chats, response.user.is_premium);
        Ok(response.user)
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<UserProfile, AppError> {
        require("email", email)?;
        require("password", password)?;
        require("fullName", full_name)?;
        let request = SignupRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            full_name: full_name.trim().to_string(),
        };
        let response = self.api.signup(&request).await?;
        self.auth.set_auth(response.token, response.user.clone());
        selection::prune_ineligible(&self.chats, response.user.is_premium);
        Ok(response.user)
    }

    /// Finishes an OAuth redirect: the token is stored first so the profile
    /// request is authenticated, and the session is dropped if that fails.
    pub async fn complete_oauth_callback(&self, token: &str) -> Result<UserProfile, AppError> {
        require("token", token)?;
        self.auth.set_token(token.trim());
        match self.api.me().await {
            Ok(user) => {
                self.auth.set_auth(token.trim(), user.clone());
                Ok(user)
            }
            Err(e) => {
                error!("Failed to finalize login: {e}");
                self.auth.logout();
                Err(e)
            }
        }
    }

    /// Re-reads the profile from the backend (premium flag, credits).
    pub async fn refresh_profile(&self) -> Result<UserProfile, AppError> {
        let token = self.auth.token().ok_or(AppError::Unauthorized)?;
        let user = self.guard(self.api.me().await)?;
        self.auth.set_auth(token, user.clone());
        selection::prune_ineligible(&self.chats, user.is_premium);
        Ok(user)
    }

    pub fn logout(&self) {
        self.auth.logout();
        selection::prune_ineligible(&self.chats, false);
        info!("Signed out");
    }

    pub fn upgrade(&self) -> Result<UserProfile, AppError> {
        let user = self.auth.upgrade_to_premium()?;
        info!("{} upgraded to the Expert tier", user.email);
        Ok(user)
    }

    /// Turns a 401 from any protected call into a forced logout.
    pub fn guard<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            if e.is_auth() && self.auth.is_authenticated() {
                warn!("Session rejected by the server, signing out");
                self.logout();
            }
        }
        result
    }
}

fn require(field_name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::empty_field(field_name));
    }
    Ok(())
}
