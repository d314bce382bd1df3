use tracing::info;

use crate::error::Error;
use crate::types::User;

/// Outcome of a login call the server accepted
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub status: u16,
    pub user: User,
    /// Value of the `Token` response header, if any
    pub token: Option<String>,
}

/// Authenticated session, held in memory for the rest of the run
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    /// Build a session from a login response.
    ///
    /// A successful login without a token is an error of its own.
    pub fn from_login(response: LoginResponse) -> Result<Self, Error> {
        match response.token {
            Some(token) if !token.is_empty() => {
                info!("Logged in as {} ({})", response.user.username, response.user.id);
                Ok(Self {
                    token,
                    user: response.user,
                })
            }
            _ => Err(Error::MissingToken {
                status: response.status,
            }),
        }
    }
}
