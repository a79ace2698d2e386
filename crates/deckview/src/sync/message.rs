//! Sync protocol messages and their wire format.
//!
//! On the wire every message is one flat, versionless JSON record:
//!
//! ```text
//! {"type":"SLIDE_CHANGE","index":3,"source":"presenter"}
//! ```
//!
//! `SYNC_REQUEST` carries `index: 0`, which receivers ignore.

use serde::{Deserialize, Serialize};

/// Which kind of view originated a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Audience,
    Presenter,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audience => write!(f, "audience"),
            Self::Presenter => write!(f, "presenter"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMessage {
    /// A view moved to `index`.
    SlideChange { index: usize, source: Source },
    /// A view asks whoever is listening for the current index.
    SyncRequest { source: Source },
    /// Answer to a `SyncRequest`.
    SyncResponse { index: usize, source: Source },
}

impl SyncMessage {
    pub fn source(&self) -> Source {
        match *self {
            Self::SlideChange { source, .. }
            | Self::SyncRequest { source }
            | Self::SyncResponse { source, .. } => source,
        }
    }

    /// The slide index carried by the message, if it carries one.
    #[cfg(test)]
    pub fn index(&self) -> Option<usize> {
        match *self {
            Self::SlideChange { index, .. } | Self::SyncResponse { index, .. } => Some(index),
            Self::SyncRequest { .. } => None,
        }
    }

    pub fn encode(&self) -> String {
        let wire = WireMessage::from(*self);
        // A struct of an enum, an integer and an enum always serializes.
        serde_json::to_string(&wire).unwrap_or_default()
    }

    pub fn decode(frame: &str) -> Result<Self, WireError> {
        let wire: WireMessage = serde_json::from_str(frame)?;
        wire.try_into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed sync frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("slide index {0} does not fit this platform")]
    IndexOverflow(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum MessageKind {
    SlideChange,
    SyncRequest,
    SyncResponse,
}

/// The flat record that actually crosses the transport.
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: MessageKind,
    index: u64,
    source: Source,
}

impl From<SyncMessage> for WireMessage {
    fn from(msg: SyncMessage) -> Self {
        let (kind, index) = match msg {
            SyncMessage::SlideChange { index, .. } => (MessageKind::SlideChange, index),
            SyncMessage::SyncRequest { .. } => (MessageKind::SyncRequest, 0),
            SyncMessage::SyncResponse { index, .. } => (MessageKind::SyncResponse, index),
        };
        Self {
            kind,
            index: index as u64,
            source: msg.source(),
        }
    }
}

impl TryFrom<WireMessage> for SyncMessage {
    type Error = WireError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        let index = usize::try_from(wire.index).map_err(|_| WireError::IndexOverflow(wire.index))?;
        let source = wire.source;
        Ok(match wire.kind {
            MessageKind::SlideChange => Self::SlideChange { index, source },
            MessageKind::SyncRequest => Self::SyncRequest { source },
            MessageKind::SyncResponse => Self::SyncResponse { index, source },
        })
    }
}
