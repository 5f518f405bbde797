use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Username and password pair sent to both `/auth/login` and
/// `/auth/create_user`. Validation is up to whoever collects them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Credentials {
        return Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
    }
}

// Keeps passwords out of logs and panics.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    return "bearer".to_string();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    #[serde(rename = "Action")]
    pub action: String,
    pub user_id: String,
}
