use crate::view_model::AppViewModel;
use crate::{EpisodePage, LibraryItem, QueueItem, SearchResultItem};

pub type Generation = u64;
pub type DebounceTicket = u64;
pub type StreamId = u64;

/// Lifecycle of the most recent search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Waiting for the debounce window to close.
    Pending,
    InFlight,
    Completed,
    Cancelled,
    TimedOut,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub term: String,
    pub generation: Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamStatus {
    #[default]
    Idle,
    Starting,
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SearchState {
    term: String,
    last_ticket: DebounceTicket,
    pending_ticket: Option<DebounceTicket>,
    generation: Generation,
    live: Option<SearchSession>,
    phase: SearchPhase,
    results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct StreamState {
    last_id: StreamId,
    current: Option<StreamId>,
    status: StreamStatus,
    transcript: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    search: SearchState,
    stream: StreamState,
    episodes: Option<EpisodePage>,
    library: Vec<LibraryItem>,
    queue: Vec<QueueItem>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            search_term: self.search.term.clone(),
            generation: self.search.generation,
            search_phase: self.search.phase,
            debounce_pending: self.search.pending_ticket.is_some(),
            result_count: self.search.results.len(),
            stream_status: self.stream.status,
            transcript: self.stream.transcript.clone(),
            episode_count: self.episodes.as_ref().map_or(0, |page| page.episodes.len()),
            library_count: self.library.len(),
            queue_count: self.queue.len(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn live_search(&self) -> Option<&SearchSession> {
        self.search.live.as_ref()
    }

    pub fn search_results(&self) -> &[SearchResultItem] {
        &self.search.results
    }

    pub fn episodes(&self) -> Option<&EpisodePage> {
        self.episodes.as_ref()
    }

    pub fn stream_status(&self) -> StreamStatus {
        self.stream.status
    }

    pub fn current_stream(&self) -> Option<StreamId> {
        self.stream.current
    }

    pub fn transcript(&self) -> &str {
        &self.stream.transcript
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ---- search -----------------------------------------------------------

    pub(crate) fn begin_debounce(&mut self, term: String) -> DebounceTicket {
        self.search.last_ticket += 1;
        self.search.pending_ticket = Some(self.search.last_ticket);
        self.search.term = term;
        if self.search.live.is_none() {
            self.search.phase = SearchPhase::Pending;
        }
        self.mark_dirty();
        self.search.last_ticket
    }

    /// Consumes the pending debounce if `ticket` is the latest one.
    pub(crate) fn take_pending_search(&mut self, ticket: DebounceTicket) -> Option<String> {
        if self.search.pending_ticket != Some(ticket) {
            return None;
        }
        self.search.pending_ticket = None;
        Some(self.search.term.clone())
    }

    /// Opens a new session and returns its generation. Any prior live session
    /// is superseded by the bump.
    pub(crate) fn start_search(&mut self, term: String) -> Generation {
        self.search.generation += 1;
        let generation = self.search.generation;
        self.search.live = Some(SearchSession { term, generation });
        self.search.phase = SearchPhase::InFlight;
        self.mark_dirty();
        generation
    }

    pub(crate) fn is_live_search(&self, generation: Generation) -> bool {
        self.search
            .live
            .as_ref()
            .is_some_and(|session| session.generation == generation)
    }

    pub(crate) fn finish_search(&mut self, phase: SearchPhase) {
        self.search.live = None;
        self.search.phase = if self.search.pending_ticket.is_some() {
            SearchPhase::Pending
        } else {
            phase
        };
        self.mark_dirty();
    }

    pub(crate) fn set_results(&mut self, results: Vec<SearchResultItem>) {
        self.search.results = results;
        self.mark_dirty();
    }

    // ---- stream -----------------------------------------------------------

    /// Allocates a new stream session in `Starting`. Returns the new id and the
    /// id of a session that was still active and must be closed first.
    pub(crate) fn begin_stream(&mut self) -> (StreamId, Option<StreamId>) {
        let previous = self.active_stream();
        self.stream.last_id += 1;
        self.stream.current = Some(self.stream.last_id);
        self.stream.status = StreamStatus::Starting;
        self.mark_dirty();
        (self.stream.last_id, previous)
    }

    pub(crate) fn active_stream(&self) -> Option<StreamId> {
        match self.stream.status {
            StreamStatus::Starting | StreamStatus::Open => self.stream.current,
            StreamStatus::Idle | StreamStatus::Closed => None,
        }
    }

    pub(crate) fn accepts_stream(&self, stream_id: StreamId) -> bool {
        self.active_stream() == Some(stream_id)
    }

    pub(crate) fn mark_stream_open(&mut self, stream_id: StreamId) {
        if self.stream.current == Some(stream_id) && self.stream.status == StreamStatus::Starting {
            self.stream.status = StreamStatus::Open;
            self.mark_dirty();
        }
    }

    pub(crate) fn append_transcript(&mut self, chunk: &str) {
        self.stream.transcript.push_str(chunk);
        self.mark_dirty();
    }

    /// Closes the active session, if any, and returns its id.
    pub(crate) fn close_stream(&mut self) -> Option<StreamId> {
        let active = self.active_stream()?;
        self.stream.status = StreamStatus::Closed;
        self.mark_dirty();
        Some(active)
    }

    // ---- lists ------------------------------------------------------------

    pub(crate) fn set_episodes(&mut self, page: EpisodePage) {
        self.episodes = Some(page);
        self.mark_dirty();
    }

    pub(crate) fn set_library(&mut self, items: Vec<LibraryItem>) {
        self.library = items;
        self.mark_dirty();
    }

    pub(crate) fn set_queue(&mut self, items: Vec<QueueItem>) {
        self.queue = items;
        self.mark_dirty();
    }
}
