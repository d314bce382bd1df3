use serde::Deserialize;

/// Mattermost user account
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}
