use std::io::{self, Write};

use tracing::debug;

use super::output::{print_channel, print_note, print_section, print_team};
use super::prompt::Prompt;
use crate::api::{MattermostApi, Session, CURRENT_USER};
use crate::config::Config;
use crate::error::Error;

pub const PASSWORD_PROMPT: &str = "Mattermost Password: ";
pub const TOKEN_PROMPT: &str = "TOTP Token: ";

/// Log in with MFA, then print the user's teams and their channels.
///
/// Stops at the first failure; an account without teams is not a failure.
pub async fn run<A, P, W>(
    api: &A,
    config: Config,
    prompt: &mut P,
    out: &mut W,
) -> Result<(), Error>
where
    A: MattermostApi,
    P: Prompt,
    W: Write,
{
    let Config {
        url,
        username,
        mut password,
    } = config;

    if password.is_empty() {
        password = prompt
            .password(PASSWORD_PROMPT)
            .map_err(|e| Error::input("password", e))?;
    }

    writeln!(out, "connecting to {} as {}...", url, username)?;

    let line = prompt
        .line(TOKEN_PROMPT)
        .map_err(|e| Error::input("TOTP token", e))?;
    let mfa_token = parse_token(&line).ok_or_else(|| {
        Error::input(
            "TOTP token",
            io::Error::new(io::ErrorKind::InvalidInput, "unexpected newline"),
        )
    })?;

    let response = api
        .login_with_mfa(&username, &password, mfa_token)
        .await
        .map_err(Error::Auth)?;
    let session = Session::from_login(response)?;

    print_section(out, "Authentication successful")?;
    writeln!(
        out,
        "logged in as {} (ID: {})",
        session.user.username, session.user.id
    )?;

    list_teams(api, &session, out).await
}

/// First whitespace-delimited word of the input line
fn parse_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

async fn list_teams<A: MattermostApi, W: Write>(
    api: &A,
    session: &Session,
    out: &mut W,
) -> Result<(), Error> {
    writeln!(out)?;
    print_section(out, "Listing Teams")?;

    let teams = api
        .teams_for_user(session, CURRENT_USER)
        .await
        .map_err(Error::Api)?;

    if teams.is_empty() {
        writeln!(out, "User has no teams")?;
        return Ok(());
    }

    writeln!(out)?;
    print_section(out, "Listing Channels")?;

    for team in &teams {
        print_team(out, team)?;

        let channels = api
            .channels_for_team_for_user(session, &team.id, CURRENT_USER)
            .await
            .map_err(|e| {
                Error::Api(e.with_operation(format!("Channels from team {}", team.label())))
            })?;

        if channels.is_empty() {
            print_note(out, "Team has no channels")?;
            continue;
        }

        for channel in &channels {
            if channel.kind.is_conversation() {
                debug!("Skipping {} conversation {}", channel.kind, channel.id);
                continue;
            }
            print_channel(out, channel)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, LoginResponse};
    use crate::types::{Channel, ChannelType, Team, User};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeApi {
        token: Option<String>,
        reject_login: bool,
        teams: Vec<Team>,
        channels: HashMap<String, Vec<Channel>>,
        failing_team: Option<String>,
        logins: RefCell<Vec<(String, String, String)>>,
        tokens_seen: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn with_token() -> Self {
            Self {
                token: Some("session-token".to_string()),
                ..Default::default()
            }
        }
    }

    fn server_error(operation: &str, status: u16) -> ApiError {
        ApiError::Server {
            operation: operation.to_string(),
            status,
            message: "nope".to_string(),
            id: "api.error".to_string(),
        }
    }

    impl MattermostApi for FakeApi {
        async fn login_with_mfa(
            &self,
            login_id: &str,
            password: &str,
            mfa_token: &str,
        ) -> Result<LoginResponse, ApiError> {
            self.logins.borrow_mut().push((
                login_id.to_string(),
                password.to_string(),
                mfa_token.to_string(),
            ));
            if self.reject_login {
                return Err(server_error("MFA login", 401));
            }
            Ok(LoginResponse {
                status: 200,
                user: User {
                    id: "u1".to_string(),
                    username: login_id.to_string(),
                    ..Default::default()
                },
                token: self.token.clone(),
            })
        }

        async fn teams_for_user(
            &self,
            session: &Session,
            user_id: &str,
        ) -> Result<Vec<Team>, ApiError> {
            assert_eq!(user_id, CURRENT_USER);
            self.tokens_seen.borrow_mut().push(session.token.clone());
            Ok(self.teams.clone())
        }

        async fn channels_for_team_for_user(
            &self,
            session: &Session,
            team_id: &str,
            _user_id: &str,
        ) -> Result<Vec<Channel>, ApiError> {
            self.tokens_seen.borrow_mut().push(session.token.clone());
            if self.failing_team.as_deref() == Some(team_id) {
                return Err(server_error("GetChannelsForTeamForUser", 403));
            }
            Ok(self.channels.get(team_id).cloned().unwrap_or_default())
        }
    }

    struct ScriptedPrompt {
        password: String,
        line: Option<String>,
        asked: Vec<String>,
    }

    impl ScriptedPrompt {
        fn new(line: &str) -> Self {
            Self {
                password: "prompted-secret".to_string(),
                line: Some(line.to_string()),
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn password(&mut self, label: &str) -> io::Result<String> {
            self.asked.push(label.to_string());
            Ok(self.password.clone())
        }

        fn line(&mut self, label: &str) -> io::Result<String> {
            self.asked.push(label.to_string());
            self.line
                .take()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no input"))
        }
    }

    fn config(password: &str) -> Config {
        Config {
            url: "https://chat.example.com".to_string(),
            username: "alice".to_string(),
            password: password.to_string(),
        }
    }

    fn team(id: &str, display_name: &str) -> Team {
        Team {
            id: id.to_string(),
            name: id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn channel(id: &str, display_name: &str, kind: ChannelType) -> Channel {
        Channel {
            id: id.to_string(),
            name: format!("{}-name", id),
            display_name: display_name.to_string(),
            kind,
        }
    }

    async fn run_with(
        api: &FakeApi,
        config: Config,
        prompt: &mut ScriptedPrompt,
    ) -> (Result<(), Error>, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let result = run(api, config, prompt, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_lists_channels_and_skips_conversations() {
        let mut api = FakeApi::with_token();
        api.teams = vec![team("t1", "Core Team")];
        api.channels.insert(
            "t1".to_string(),
            vec![
                channel("c1", "", ChannelType::Direct),
                channel("c2", "Town Square", ChannelType::Public),
                channel("c3", "", ChannelType::Group),
            ],
        );
        let mut prompt = ScriptedPrompt::new("123456\n");

        let (result, out) = run_with(&api, config("hunter2"), &mut prompt).await;
        result.unwrap();

        assert!(out.contains("connecting to https://chat.example.com as alice..."));
        assert!(out.contains("logged in as alice (ID: u1)"));
        assert!(out.contains("== Team: Core Team"));
        assert!(out.contains("   - Channel: Town Square (Type: public, ID: c2)"));
        assert!(!out.contains("c1"));
        assert!(!out.contains("c3"));
        assert_eq!(api.tokens_seen.borrow().as_slice(), ["session-token", "session-token"]);
    }

    #[tokio::test]
    async fn test_password_prompted_only_when_missing() {
        let api = FakeApi::with_token();
        let mut prompt = ScriptedPrompt::new("123456\n");
        let (result, _) = run_with(&api, config(""), &mut prompt).await;
        result.unwrap();
        assert_eq!(prompt.asked, vec![PASSWORD_PROMPT, TOKEN_PROMPT]);
        assert_eq!(api.logins.borrow()[0].1, "prompted-secret");

        let api = FakeApi::with_token();
        let mut prompt = ScriptedPrompt::new("123456\n");
        let (result, _) = run_with(&api, config("hunter2"), &mut prompt).await;
        result.unwrap();
        assert_eq!(prompt.asked, vec![TOKEN_PROMPT]);
        assert_eq!(api.logins.borrow()[0].1, "hunter2");
    }

    #[tokio::test]
    async fn test_token_is_first_word() {
        let api = FakeApi::with_token();
        let mut prompt = ScriptedPrompt::new("  654321  trailing\n");
        let (result, _) = run_with(&api, config("hunter2"), &mut prompt).await;
        result.unwrap();
        assert_eq!(api.logins.borrow()[0].2, "654321");
    }

    #[tokio::test]
    async fn test_empty_token_is_input_error() {
        let api = FakeApi::with_token();
        let mut prompt = ScriptedPrompt::new("\n");
        let (result, _) = run_with(&api, config("hunter2"), &mut prompt).await;
        assert!(matches!(result, Err(Error::Input { what: "TOTP token", .. })));
        assert!(api.logins.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_end_of_input_is_input_error() {
        let api = FakeApi::with_token();
        let mut prompt = ScriptedPrompt::new("");
        prompt.line = None;
        let (result, _) = run_with(&api, config("hunter2"), &mut prompt).await;
        assert!(matches!(result, Err(Error::Input { .. })));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let api = FakeApi {
            reject_login: true,
            ..FakeApi::with_token()
        };
        let mut prompt = ScriptedPrompt::new("000000\n");
        let (result, _) = run_with(&api, config("hunter2"), &mut prompt).await;

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().starts_with("MFA login failed (Status: 401"));
    }

    #[tokio::test]
    async fn test_login_without_token() {
        let api = FakeApi::default();
        let mut prompt = ScriptedPrompt::new("123456\n");
        let (result, out) = run_with(&api, config("hunter2"), &mut prompt).await;

        let err = result.unwrap_err();
        assert!(matches!(err, Error::MissingToken { status: 200 }));
        assert!(!out.contains("Authentication successful"));
        assert!(api.tokens_seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_no_teams() {
        let api = FakeApi::with_token();
        let mut prompt = ScriptedPrompt::new("123456\n");
        let (result, out) = run_with(&api, config("hunter2"), &mut prompt).await;

        result.unwrap();
        assert!(out.contains("User has no teams"));
        assert!(!out.contains("Listing Channels"));
    }

    #[tokio::test]
    async fn test_team_without_channels() {
        let mut api = FakeApi::with_token();
        api.teams = vec![team("t1", "")];
        let mut prompt = ScriptedPrompt::new("123456\n");
        let (result, out) = run_with(&api, config("hunter2"), &mut prompt).await;

        result.unwrap();
        assert!(out.contains("== Team: t1"));
        assert!(out.contains("   (Team has no channels)"));
    }

    #[tokio::test]
    async fn test_channel_failure_aborts_run() {
        let mut api = FakeApi::with_token();
        api.teams = vec![team("t1", "Core Team"), team("t2", "Ops")];
        api.channels.insert(
            "t2".to_string(),
            vec![channel("c9", "Alerts", ChannelType::Public)],
        );
        api.failing_team = Some("t1".to_string());
        let mut prompt = ScriptedPrompt::new("123456\n");
        let (result, out) = run_with(&api, config("hunter2"), &mut prompt).await;

        let err = result.unwrap_err();
        match &err {
            Error::Api(ApiError::Server {
                operation, status, ..
            }) => {
                assert_eq!(operation, "Channels from team Core Team");
                assert_eq!(*status, 403);
            }
            other => panic!("expected API error, got {other:?}"),
        }
        assert!(!out.contains("Alerts"));
    }
}
