//! m2sh - Mattermost command-line client
//!
//! Logs in with username, password and TOTP token, then lists the teams and
//! channels visible to the account.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod types;

pub use api::client::MattermostClient;
pub use config::Config;
pub use error::Error;
