// Authentication endpoints
//
// Login exchanges email/password for a bearer token; `/auth/me`
// validates the installed token. Neither method mutates the client's
// token slot; the Session Gate in `tvws-core` owns that lifecycle.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::SpectrumClient;
use crate::error::Error;
use crate::model::{Identity, LoginSession};

impl SpectrumClient {
    /// Authenticate with the service.
    ///
    /// `POST /auth/login` with `{email, password}`. Returns the issued
    /// bearer token plus the resolved user identity. Does not install
    /// the token on this client.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginSession, Error> {
        let url = self.endpoint(&["auth", "login"]);
        debug!(email, "logging in");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        self.post_anonymous(url, &body).await
    }

    /// Validate the installed bearer token.
    ///
    /// `GET /auth/me`. Returns [`Error::Authentication`] when the token
    /// is missing, invalid, or expired.
    pub async fn current_user(&self) -> Result<Identity, Error> {
        let url = self.endpoint(&["auth", "me"]);
        debug!("validating session");
        self.get(url).await
    }
}
