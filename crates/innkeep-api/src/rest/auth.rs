// Auth endpoints
//
// Login trades credentials for a bearer token; verify is the auth gate
// run on every start-up with a stored token.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{LoginData, User};
use crate::models::property::VerifyData;
use crate::rest::ApiClient;

impl ApiClient {
    /// `POST /api/auth/login` with `{ email, password }`.
    ///
    /// Returns the issued token and the user; the client itself is not
    /// modified, callers switch to an authenticated copy via
    /// [`ApiClient::with_token`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginData, Error> {
        debug!(email, "logging in");
        self.post(
            "api/auth/login",
            &json!({ "email": email, "password": password.expose_secret() }),
        )
        .await
    }

    /// `GET /api/auth/verify`. 401 surfaces as [`Error::Unauthorized`].
    pub async fn verify(&self) -> Result<User, Error> {
        if !self.is_authenticated() {
            return Err(Error::MissingToken);
        }
        let data: VerifyData = self.get("api/auth/verify").await?;
        Ok(data.into_user())
    }

    /// `POST /api/auth/logout`. Best effort: the token is discarded locally
    /// whatever the server says.
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_authenticated() {
            return Ok(());
        }
        self.post_unit("api/auth/logout", &json!({})).await
    }
}
