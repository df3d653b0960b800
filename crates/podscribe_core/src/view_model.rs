use crate::{Generation, SearchPhase, StreamStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub search_term: String,
    pub generation: Generation,
    pub search_phase: SearchPhase,
    pub debounce_pending: bool,
    pub result_count: usize,
    pub stream_status: StreamStatus,
    pub transcript: String,
    pub episode_count: usize,
    pub library_count: usize,
    pub queue_count: usize,
    pub dirty: bool,
}
