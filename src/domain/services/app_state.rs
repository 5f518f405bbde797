#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use super::SessionManager;
use crate::domain::models::ClientError;
use crate::domain::models::Loading;
use crate::domain::models::Route;
use crate::infrastructure::api::ApiClient;

pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

/// Application shell for the interactive mode. Owns the current route and is
/// the one place that reacts to a rejected session: every backend result a
/// screen gets passes through `observe`.
pub struct AppState {
    pub route: Route,
    pub loading: Loading,
    manager: SessionManager,
    notice: Option<String>,
}

impl AppState {
    pub fn new(manager: SessionManager) -> AppState {
        let mut app_state = AppState {
            route: Route::Dashboard,
            loading: Loading::default(),
            manager,
            notice: None,
        };
        app_state.navigate(Route::Dashboard);

        return app_state;
    }

    pub fn manager(&self) -> &SessionManager {
        return &self.manager;
    }

    pub fn api(&self) -> &ApiClient {
        return self.manager.api();
    }

    /// Moves to `route`, redirecting protected screens to login when there is
    /// no session and login to the dashboard when there is one.
    pub fn navigate(&mut self, route: Route) {
        let authenticated = self.manager.is_authenticated();
        let next = if route.requires_auth() && !authenticated {
            Route::Login
        } else if route == Route::Login && authenticated {
            Route::Dashboard
        } else {
            route
        };

        tracing::debug!(route = ?next, "Navigating");
        self.route = next;
    }

    /// Hands `res` back unchanged. An `AuthorizationExpired` error first logs
    /// the session out and sends the user to login.
    pub fn observe<T>(&mut self, res: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(ClientError::AuthorizationExpired) = &res {
            tracing::warn!(route = ?self.route, "Session rejected by backend, logging out");
            self.manager.logout();
            self.notice = Some(SESSION_EXPIRED_NOTICE.to_string());
            self.navigate(Route::Login);
        }

        return res;
    }

    pub fn logout(&mut self) {
        self.manager.logout();
        self.navigate(Route::Login);
    }

    /// Takes the pending one-time notice for the next screen to print.
    pub fn take_notice(&mut self) -> Option<String> {
        return self.notice.take();
    }
}
