//! Session Gate: exclusive owner of the bearer credential.
//!
//! The gate wraps a [`SpectrumClient`] and a durable [`TokenStore`].
//! Other components never touch the credential directly; they borrow
//! the client through [`SessionGate::client`] and every outbound request
//! picks up the installed token.

use std::sync::RwLock;

use secrecy::SecretString;
use tracing::{debug, info};

use tvws_api::{Identity, SpectrumClient};

use crate::error::CoreError;

/// Durable storage for the session token, keyed by a fixed name on the
/// implementation side (keyring entry, env var, ...).
///
/// `store` and `clear` are best-effort: a broken backing store degrades
/// the session to process-lifetime only, it does not fail the login.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// Process-local token store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a token (simulates a previous session).
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_owned())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    fn store(&self, token: &str) {
        *self.token.write().expect("token lock poisoned") = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }
}

/// Holds the bearer credential and mediates every authenticated call.
pub struct SessionGate {
    client: SpectrumClient,
    store: Box<dyn TokenStore>,
}

impl SessionGate {
    /// Build a gate around a client, restoring any previously stored
    /// token. The restored token is not validated until first use.
    pub fn new(client: SpectrumClient, store: Box<dyn TokenStore>) -> Self {
        if let Some(token) = store.load() {
            debug!("restoring stored session token");
            client.set_token(token);
        }
        Self { client, store }
    }

    /// The underlying client, with the current credential installed.
    pub fn client(&self) -> &SpectrumClient {
        &self.client
    }

    /// Whether a credential is currently installed (not necessarily valid).
    pub fn is_authenticated(&self) -> bool {
        self.client.has_token()
    }

    /// Exchange email/password for a session.
    ///
    /// On success the token is installed on the client and persisted to
    /// the store; the resolved identity is returned. On failure the
    /// existing session (if any) is left untouched.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, CoreError> {
        let session = self
            .client
            .login(email, password)
            .await
            .map_err(CoreError::auth_from)?;

        self.store.store(&session.access_token);
        self.client.set_token(session.access_token);
        info!(email, "authenticated");
        Ok(session.user)
    }

    /// Validate the stored credential against the service.
    ///
    /// Returns `None` without a network call when no credential is
    /// installed. **Side effect**: when the service reports the
    /// credential invalid or expired, the gate auto-deauthenticates
    /// (the token is cleared from both the client and the durable store)
    /// and `None` is returned. Transport failures propagate as errors
    /// and do not destroy a possibly-valid session.
    pub async fn current_identity(&self) -> Result<Option<Identity>, CoreError> {
        if !self.client.has_token() {
            return Ok(None);
        }

        match self.client.current_user().await {
            Ok(identity) => Ok(Some(identity)),
            Err(err) if err.is_auth_expired() => {
                info!("stored session rejected by service; clearing credential");
                self.deauthenticate();
                Ok(None)
            }
            Err(err) => Err(CoreError::auth_from(err)),
        }
    }

    /// Drop the credential from the client and the durable store.
    pub fn deauthenticate(&self) {
        self.client.clear_token();
        self.store.clear();
        debug!("session cleared");
    }
}
