use std::io;

use thiserror::Error;

pub use crate::api::ApiError;
pub use crate::config::ConfigError;

/// Every way a run can fail. None of these are retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error reading {what}")]
    Input {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    /// The server rejected the MFA login.
    #[error(transparent)]
    Auth(ApiError),

    #[error("login ok (Status {status}), but no auth token returned from server")]
    MissingToken { status: u16 },

    /// A listing call after login failed.
    #[error(transparent)]
    Api(ApiError),

    #[error("error writing output")]
    Output(#[from] io::Error),
}

impl Error {
    pub(crate) fn input(what: &'static str, source: io::Error) -> Self {
        Self::Input { what, source }
    }
}
