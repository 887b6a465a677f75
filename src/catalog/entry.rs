//! Finalized catalog entry types

use std::fmt;

/// Kind of a published channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Tv,
    Radio,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Tv => write!(f, "TV"),
            ChannelKind::Radio => write!(f, "Radio"),
        }
    }
}

/// Where a channel's icon comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelIcon {
    /// Channel has no icon field
    #[default]
    None,
    /// Absolute URL the front-end can fetch directly
    Remote(String),
    /// Icon must be fetched through the backend; locator is in the icon cache
    Local,
}

/// A channel as published to the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    /// Channel id as a string
    pub id: String,

    /// Display name (None when the record never carried one)
    pub name: Option<String>,

    /// Display number, "major" or "major.minor"
    pub number: Option<String>,

    /// TV or radio
    pub kind: ChannelKind,

    /// Icon source
    pub icon: ChannelIcon,
}

impl ChannelEntry {
    /// Remote icon URL, if any
    pub fn icon_url(&self) -> Option<&str> {
        match &self.icon {
            ChannelIcon::Remote(url) => Some(url),
            _ => None,
        }
    }

    /// Whether the icon has to be looked up in the icon cache
    pub fn has_local_icon(&self) -> bool {
        self.icon == ChannelIcon::Local
    }
}

impl fmt::Display for ChannelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.id,
            self.number.as_deref().unwrap_or("-"),
            self.kind,
            self.name.as_deref().unwrap_or("<unnamed>")
        )
    }
}

/// Format a channel number, with the minor part if present
pub fn format_channel_number(major: i64, minor: Option<i64>) -> String {
    match minor {
        Some(minor) => format!("{}.{}", major, minor),
        None => major.to_string(),
    }
}
