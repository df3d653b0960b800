use std::time::Duration;

use crate::{
    DebounceTicket, EpisodePage, Generation, LibraryItem, MutationRequest, QueueItem,
    SearchResultItem, StreamId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the debounce timer, replacing any previous one.
    ScheduleDebounce {
        ticket: DebounceTicket,
        delay: Duration,
    },
    IssueSearch {
        generation: Generation,
        term: String,
        timeout: Duration,
    },
    /// Best-effort cancellation of a superseded search.
    CancelSearch { generation: Generation },
    StartTranscription { audio_url: String },
    OpenStream { stream_id: StreamId },
    CloseStream { stream_id: StreamId },
    Mutate(MutationRequest),
    LoadEpisodes { podcast_id: String, page: u32 },
    LoadLibrary,
    LoadQueue,
    Present(Presentation),
}

/// Everything the presenter can be asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Loading, timeout or failure text for the search results area.
    SearchStatus(String),
    SearchResults(Vec<SearchResultItem>),
    Episodes(EpisodePage),
    Library(Vec<LibraryItem>),
    Queue(Vec<QueueItem>),
    AppendTranscript(String),
    Notice(String),
    Error(String),
}
