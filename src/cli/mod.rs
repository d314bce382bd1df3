pub mod output;
pub mod prompt;
pub mod session;

use clap::Parser;

const LONG_ABOUT: &str = "\
Log in to a Mattermost server with username, password and TOTP token, then list
the teams and channels of the account.

Settings are read from the first existing file of ./m2sh.ini, ~/.m2sh.ini,
~/.config/m2sh.ini and /etc/m2sh/m2sh.ini (keys url, username, password) and
overridden by MM_URL, MM_USERNAME and MM_PASSWORD. A missing password is
asked for on the terminal.";

/// Mattermost CLI: MFA login, then list teams and channels
#[derive(Parser, Debug)]
#[command(name = "m2sh")]
#[command(version, about, long_about = LONG_ABOUT)]
pub struct Cli {}
