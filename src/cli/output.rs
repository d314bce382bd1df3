use std::io::{self, Write};

use colored::Colorize;

use crate::types::{Channel, Team};

/// Print a `--- title ---` section header
pub fn print_section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("--- {} ---", title).bold())
}

/// Print a team heading
pub fn print_team<W: Write>(out: &mut W, team: &Team) -> io::Result<()> {
    writeln!(out, "== Team: {}", team.label().cyan())
}

/// Print one channel line below its team
pub fn print_channel<W: Write>(out: &mut W, channel: &Channel) -> io::Result<()> {
    writeln!(
        out,
        "   - Channel: {} (Type: {}, ID: {})",
        channel.label(),
        channel.kind,
        channel.id
    )
}

/// Print an indented note below a team
pub fn print_note<W: Write>(out: &mut W, note: &str) -> io::Result<()> {
    writeln!(out, "   ({})", note.dimmed())
}
