use std::fmt;

use podscribe_core::{
    DebounceTicket, EpisodePage, Generation, LibraryItem, MutationKind, PushedEvent, QueueItem,
    SearchResultItem, StreamId,
};
use serde::Deserialize;

/// Completions reported by engine tasks, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    DebounceElapsed {
        ticket: DebounceTicket,
    },
    SearchCompleted {
        generation: Generation,
        result: Result<Vec<SearchResultItem>, ApiError>,
    },
    TranscriptionStarted {
        result: Result<StatusReply, ApiError>,
    },
    StreamOpened {
        stream_id: StreamId,
    },
    StreamEvent {
        stream_id: StreamId,
        event: PushedEvent,
    },
    StreamFailed {
        stream_id: StreamId,
        error: ApiError,
    },
    /// The server closed the connection without an error event.
    StreamEnded {
        stream_id: StreamId,
    },
    MutationCompleted {
        kind: MutationKind,
        result: Result<StatusReply, ApiError>,
    },
    EpisodesLoaded {
        result: Result<EpisodePage, ApiError>,
    },
    LibraryLoaded {
        result: Result<Vec<LibraryItem>, ApiError>,
    },
    QueueLoaded {
        result: Result<Vec<QueueItem>, ApiError>,
    },
}

/// `{status, message}` body shared by the start and mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-2xx response.
    HttpStatus(u16),
    Timeout,
    Cancelled,
    /// Connection-level failure.
    Transport,
    /// Body did not have the expected shape.
    Protocol,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Transport => write!(f, "network error"),
            FailureKind::Protocol => write!(f, "protocol error"),
        }
    }
}
