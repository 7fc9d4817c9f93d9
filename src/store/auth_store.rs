use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::UserProfile;
use crate::storage::{self, MemoryStorage, Storage};

/// Storage key for the persisted session.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Credits granted by the Expert-tier upgrade.
pub const UPGRADE_CREDITS: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSession {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
}

/// Bearer token and user profile, persisted across runs.
#[derive(Clone)]
pub struct AuthStore {
    session: Arc<Mutex<AuthSession>>,
    storage: Arc<dyn Storage>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }
}

impl AuthStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let session: AuthSession =
            storage::load_json(storage.as_ref(), AUTH_STORAGE_KEY).unwrap_or_default();
        Self { session: Arc::new(Mutex::new(session)), storage }
    }

    fn lock(&self) -> MutexGuard<'_, AuthSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut AuthSession)) {
        let snapshot = {
            let mut session = self.lock();
            f(&mut session);
            session.clone()
        };
        let result = if snapshot.is_authenticated {
            storage::save_json(self.storage.as_ref(), AUTH_STORAGE_KEY, &snapshot)
        } else {
            self.storage.remove(AUTH_STORAGE_KEY)
        };
        if let Err(e) = result {
            warn!("Failed to persist auth session: {e}");
        }
    }

    /// Establishes an authenticated session.
    pub fn set_auth(&self, token: impl Into<String>, user: UserProfile) {
        let token = token.into();
        info!("Signed in as {}", user.email);
        self.update(|session| {
            session.token = Some(token);
            session.user = Some(user);
            session.is_authenticated = true;
        });
    }

    /// Stores a token before the profile is known (OAuth callback).
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.update(|session| {
            session.token = Some(token);
            session.is_authenticated = true;
        });
    }

    pub fn logout(&self) {
        self.update(|session| *session = AuthSession::default());
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated
    }

    pub fn is_premium(&self) -> bool {
        self.lock().user.as_ref().is_some_and(|u| u.is_premium)
    }

    /// Marks the signed-in user as Expert tier. No payment backend is
    /// involved; the entitlement is local until the next profile refresh.
    pub fn upgrade_to_premium(&self) -> Result<UserProfile, AppError> {
        let mut upgraded = None;
        self.update(|session| {
            if let (Some(_), Some(user)) = (&session.token, session.user.as_mut()) {
                user.is_premium = true;
                user.credits = UPGRADE_CREDITS;
                upgraded = Some(user.clone());
            }
        });
        upgraded.ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(premium: bool) -> UserProfile {
        UserProfile {
            email: "ada@example.com".into(),
            full_name: "Ada".into(),
            is_premium: premium,
            credits: 5,
        }
    }

    #[test]
    fn session_persists_across_instances() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        AuthStore::new(storage.clone()).set_auth("jwt", profile(false));

        let restored = AuthStore::new(storage);
        assert!(restored.is_authenticated());
        assert_eq!(restored.token().as_deref(), Some("jwt"));
        assert_eq!(restored.user().unwrap().email, "ada@example.com");
    }

    #[test]
    fn logout_clears_persisted_session() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let auth = AuthStore::new(storage.clone());
        auth.set_auth("jwt", profile(true));
        auth.logout();

        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);
        assert_eq!(storage.get(AUTH_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn upgrade_requires_session() {
        let auth = AuthStore::default();
        assert!(auth.upgrade_to_premium().unwrap_err().is_auth());

        auth.set_auth("jwt", profile(false));
        let user = auth.upgrade_to_premium().unwrap();
        assert!(user.is_premium);
        assert_eq!(user.credits, UPGRADE_CREDITS);
        assert!(auth.is_premium());
    }

    #[test]
    fn token_only_session_is_authenticated_without_profile() {
        let auth = AuthStore::default();
        auth.set_token("oauth-token");
        assert!(auth.is_authenticated());
        assert!(!auth.is_premium());
        assert_eq!(auth.user(), None);
    }
}
