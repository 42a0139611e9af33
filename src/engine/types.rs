//! Engine types
//!
//! Events emitted by a fetch and the states a fetch moves through.

use crate::error::Error;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// An event emitted while fetching
#[derive(Debug)]
pub enum FetchEvent {
    /// The first page request is about to be issued
    Start,
    /// One page arrived; carries only that page's items
    NewPage(Vec<JsonValue>),
    /// Fetching finished successfully
    End,
    /// Every item of every page, in fetch order
    AllPages(Vec<JsonValue>),
    /// The fetch failed; nothing follows
    Error(Error),
}

impl FetchEvent {
    /// The name of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start => EventKind::Start,
            Self::NewPage(_) => EventKind::NewPage,
            Self::End => EventKind::End,
            Self::AllPages(_) => EventKind::AllPages,
            Self::Error(_) => EventKind::Error,
        }
    }

    /// Items carried by `NewPage` or `AllPages`
    pub fn items(&self) -> Option<&[JsonValue]> {
        match self {
            Self::NewPage(items) | Self::AllPages(items) => Some(items),
            _ => None,
        }
    }

    /// The error carried by `Error`
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    /// JSON rendering: `{"event": "<name>", "payload": ...}`
    pub fn to_json(&self) -> JsonValue {
        let payload = match self {
            Self::Start | Self::End => JsonValue::Null,
            Self::NewPage(items) | Self::AllPages(items) => JsonValue::Array(items.clone()),
            Self::Error(e) => JsonValue::String(e.to_string()),
        };
        json!({ "event": self.kind().as_str(), "payload": payload })
    }
}

/// Event names listeners subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// `start`
    Start,
    /// `newPage`
    NewPage,
    /// `end`
    End,
    /// `allPages`
    AllPages,
    /// `error`
    Error,
}

impl EventKind {
    /// Every event kind, in emission order
    pub const ALL: [EventKind; 5] = [
        EventKind::Start,
        EventKind::NewPage,
        EventKind::End,
        EventKind::AllPages,
        EventKind::Error,
    ];

    /// Wire name of the event
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::NewPage => "newPage",
            Self::End => "end",
            Self::AllPages => "allPages",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::config(format!("unknown event '{s}'")))
    }
}

/// Lifecycle of a single fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Built, nothing requested yet
    #[default]
    Created,
    /// A page request is in flight
    FetchingPage,
    /// A page arrived and more remain
    AwaitingContinuation,
    /// All pages fetched
    Completed,
    /// A page request failed
    Failed,
}

impl FetchState {
    /// No further pages will be requested
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}
