#[cfg(test)]
#[path = "auth_services_test.rs"]
mod tests;

use super::Session;
use crate::domain::models::ClientError;
use crate::domain::models::Credentials;
use crate::domain::models::GENERIC_AUTH_FAILURE;
use crate::infrastructure::api::ApiClient;

/// Owns the session lifecycle: login, signup and logout are the only ways the
/// token changes.
///
/// `login` and `signup` are not meant to race each other. Screens wrap them in
/// `Loading::track` so a second submit is dropped while one is in flight.
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> SessionManager {
        return SessionManager { api };
    }

    pub fn api(&self) -> &ApiClient {
        return &self.api;
    }

    pub fn session(&self) -> &Session {
        return self.api.session();
    }

    pub fn is_authenticated(&self) -> bool {
        return self.session().is_authenticated();
    }

    /// Exchanges credentials for a token and makes it current. On any failure
    /// the held token is left exactly as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let res = self
            .api
            .login(credentials)
            .await
            .map_err(|err| return err.into_authentication())?;

        if res.access_token.is_empty() {
            tracing::error!(username = %credentials.username, "Login returned an empty token");
            return Err(ClientError::Authentication(GENERIC_AUTH_FAILURE.to_string()));
        }

        self.session().replace(&res.access_token);
        tracing::info!(username = %credentials.username, "Logged in");

        return Ok(());
    }

    /// Creates the account, then logs in with the same credentials. If the
    /// account is created but login fails, the login error is returned and
    /// the account stays; logging in again later is enough.
    pub async fn signup(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let created = self
            .api
            .create_user(credentials)
            .await
            .map_err(|err| return err.into_registration())?;

        tracing::info!(
            username = %credentials.username,
            user_id = %created.user_id,
            "Account created"
        );

        return self.login(credentials).await;
    }

    pub fn logout(&self) {
        let was_authenticated = self.is_authenticated();
        self.session().clear();
        if was_authenticated {
            tracing::info!("Logged out");
        }
    }
}
