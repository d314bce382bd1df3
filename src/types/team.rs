use std::fmt;

use serde::Deserialize;

/// Team the user is a member of
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

impl Team {
    /// Display name, or the URL name when the display name is blank
    pub fn label(&self) -> &str {
        non_blank(&self.display_name).unwrap_or(&self.name)
    }
}

/// Channel kind as encoded by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChannelType {
    #[serde(rename = "O")]
    Public,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
    #[serde(other)]
    Unknown,
}

impl ChannelType {
    /// Direct and group messages are conversations, not channels
    pub fn is_conversation(self) -> bool {
        matches!(self, Self::Direct | Self::Group)
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Direct => "direct",
            Self::Group => "group",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Channel within a team
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: ChannelType,
}

impl Channel {
    /// Display name, or the internal name when the display name is blank
    pub fn label(&self) -> &str {
        non_blank(&self.display_name).unwrap_or(&self.name)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
