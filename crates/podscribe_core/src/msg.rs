use std::fmt;

use crate::{
    DebounceTicket, EpisodePage, Generation, LibraryItem, MutationKind, MutationOutcome,
    PushedEvent, QueueItem, SearchResultItem, StreamId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the search box (raw, not yet debounced).
    SearchInputChanged(String),
    /// The quiet window for an input ticket expired.
    DebounceElapsed { ticket: DebounceTicket },
    /// Terminal outcome of a search session.
    SearchFinished {
        generation: Generation,
        outcome: SearchOutcome,
    },
    /// User picked an entry from the latest search results.
    SearchResultChosen { index: usize, action: ResultAction },
    /// User asked for a page of episodes of a podcast.
    EpisodesRequested { podcast_id: String, page: u32 },
    EpisodesLoaded(EpisodePage),
    /// User picked an entry from the episode page on screen.
    EpisodeChosen { index: usize, action: EpisodeAction },
    /// User asked to transcribe an audio URL.
    TranscriptionRequested { audio_url: String },
    /// Start request answered; `status` is the body's `status` field, if any.
    TranscriptionStartAcked { status: Option<String> },
    /// Start request never produced an acknowledgment body.
    TranscriptionStartFailed { reason: String },
    /// The push connection for `stream_id` is established.
    StreamOpened { stream_id: StreamId },
    /// One classified message from the push connection, in arrival order.
    StreamEvent {
        stream_id: StreamId,
        event: PushedEvent,
    },
    /// The push connection failed or sent something unparseable.
    StreamFailed {
        stream_id: StreamId,
        fault: StreamFault,
    },
    /// User clicked Stop.
    StopTranscription,
    AddToLibrary(LibraryItem),
    RemoveFromLibrary { collection_id: String },
    AddToQueue(QueueItem),
    RemoveFromQueue { episode_id: String },
    UpdateQueueStatus { episode_id: String, status: String },
    ExportTranscripts,
    /// Server answered a mutation. `detail` is the optional server message.
    MutationFinished {
        kind: MutationKind,
        outcome: MutationOutcome,
        detail: Option<String>,
    },
    LibraryRequested,
    LibraryLoaded(Vec<LibraryItem>),
    QueueRequested,
    QueueLoaded(Vec<QueueItem>),
    LoadFailed { what: LoadTarget, reason: String },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Completed(Vec<SearchResultItem>),
    /// Transport failure or non-2xx status.
    Failed,
    TimedOut,
    /// Superseded before completion.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    AddToLibrary,
    ShowEpisodes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeAction {
    Queue,
    Transcribe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFault {
    /// The connection itself reported an error or ended.
    Transport(String),
    /// A pushed message was not valid JSON.
    Protocol(String),
}

impl fmt::Display for StreamFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamFault::Transport(reason) => write!(f, "connection error: {reason}"),
            StreamFault::Protocol(reason) => write!(f, "malformed message: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Episodes,
    Library,
    Queue,
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadTarget::Episodes => write!(f, "episodes"),
            LoadTarget::Library => write!(f, "library"),
            LoadTarget::Queue => write!(f, "transcription queue"),
        }
    }
}
