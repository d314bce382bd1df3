pub mod auth;
pub mod client;

pub use auth::*;
pub use client::*;

use thiserror::Error;

use crate::types::{Channel, Team};

/// Path prefix of the REST API
pub const API_PATH: &str = "/api/v4";

/// Response header carrying the session token after login
pub const HEADER_TOKEN: &str = "token";

/// User id placeholder for the authenticated user
pub const CURRENT_USER: &str = "me";

/// A failed API call, tagged with the operation that made it
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation} failed (Status: {status}, msg: {message} (ID: {id}))")]
    Server {
        operation: String,
        status: u16,
        message: String,
        id: String,
    },

    #[error("{operation} failed: HTTP {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation} failed")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Rename the failed operation for reporting
    pub fn with_operation(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Self::Server { operation, .. }
            | Self::Status { operation, .. }
            | Self::Transport { operation, .. } => *operation = name.into(),
        }
        self
    }
}

/// The server operations a session needs.
///
/// Calls after login take the `Session` explicitly, so nothing holds a
/// token behind the caller's back.
#[allow(async_fn_in_trait)]
pub trait MattermostApi {
    async fn login_with_mfa(
        &self,
        login_id: &str,
        password: &str,
        mfa_token: &str,
    ) -> Result<LoginResponse, ApiError>;

    async fn teams_for_user(&self, session: &Session, user_id: &str)
        -> Result<Vec<Team>, ApiError>;

    async fn channels_for_team_for_user(
        &self,
        session: &Session,
        team_id: &str,
        user_id: &str,
    ) -> Result<Vec<Channel>, ApiError>;
}
