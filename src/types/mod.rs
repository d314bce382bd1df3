mod team;
mod user;

pub use team::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Error body returned by the server on failed requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppError {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub status_code: u16,
}

/// Body of the login request
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub login_id: &'a str,
    pub password: &'a str,
    /// One-time MFA code
    pub token: &'a str,
}
