use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, LoginResponse, MattermostApi, Session, API_PATH, HEADER_TOKEN};
use crate::types::{AppError, Channel, LoginRequest, Team, User};

/// Mattermost REST client
pub struct MattermostClient {
    http: Client,
    api_url: String,
}

impl MattermostClient {
    /// Create a client for the server at `server_url`
    pub fn new(server_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .build()
            .map_err(|source| ApiError::Transport {
                operation: "HTTP client setup".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            api_url: format!("{}{}", server_url.trim_end_matches('/'), API_PATH),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        session: &Session,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.api_url, path);
        debug!("→ GET {}", url);

        let res = self
            .http
            .get(&url)
            .bearer_auth(&session.token)
            .query(query)
            .send()
            .await
            .map_err(|source| transport(operation, source))?;

        let res = check_status(operation, res).await?;
        res.json().await.map_err(|source| transport(operation, source))
    }
}

fn transport(operation: &str, source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        operation: operation.to_string(),
        source,
    }
}

/// Turn a non-2xx response into an error, preferring the server's error body
async fn check_status(operation: &str, res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    debug!("← {} {}", status.as_u16(), operation);
    if status.is_success() {
        return Ok(res);
    }

    let body = res
        .text()
        .await
        .map_err(|source| transport(operation, source))?;

    match serde_json::from_str::<AppError>(&body) {
        Ok(app_error) => Err(ApiError::Server {
            operation: operation.to_string(),
            status: if app_error.status_code != 0 {
                app_error.status_code
            } else {
                status.as_u16()
            },
            message: app_error.message,
            id: app_error.id,
        }),
        Err(_) => Err(ApiError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        }),
    }
}

impl MattermostApi for MattermostClient {
    async fn login_with_mfa(
        &self,
        login_id: &str,
        password: &str,
        mfa_token: &str,
    ) -> Result<LoginResponse, ApiError> {
        const OPERATION: &str = "MFA login";
        let url = format!("{}/users/login", self.api_url);
        debug!("→ POST {}", url);

        let res = self
            .http
            .post(&url)
            .json(&LoginRequest {
                login_id,
                password,
                token: mfa_token,
            })
            .send()
            .await
            .map_err(|source| transport(OPERATION, source))?;

        let res = check_status(OPERATION, res).await?;
        let status = res.status().as_u16();
        let token = res
            .headers()
            .get(HEADER_TOKEN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let user: User = res
            .json()
            .await
            .map_err(|source| transport(OPERATION, source))?;

        Ok(LoginResponse {
            status,
            user,
            token,
        })
    }

    async fn teams_for_user(
        &self,
        session: &Session,
        user_id: &str,
    ) -> Result<Vec<Team>, ApiError> {
        self.get_json(
            "GetTeamsForUser",
            session,
            &format!("/users/{}/teams", user_id),
            &[],
        )
        .await
    }

    async fn channels_for_team_for_user(
        &self,
        session: &Session,
        team_id: &str,
        user_id: &str,
    ) -> Result<Vec<Channel>, ApiError> {
        self.get_json(
            "GetChannelsForTeamForUser",
            session,
            &format!("/users/{}/teams/{}/channels", user_id, team_id),
            &[("include_deleted", "false")],
        )
        .await
    }
}
