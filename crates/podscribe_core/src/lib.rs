//! Podscribe core: pure request/stream lifecycle state machine and view-model helpers.
mod effect;
mod messages;
mod msg;
mod mutation;
mod policy;
mod records;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Presentation};
pub use messages::{
    SEARCH_FAILED_MESSAGE, SEARCH_LOADING_MESSAGE, SEARCH_TIMED_OUT_MESSAGE, START_FAILED_MESSAGE,
};
pub use msg::{EpisodeAction, LoadTarget, Msg, ResultAction, SearchOutcome, StreamFault};
pub use mutation::{MutationKind, MutationOutcome, MutationRequest};
pub use policy::{DEBOUNCE_INTERVAL, SEARCH_TIMEOUT, TRANSCRIPTION_STARTED};
pub use records::{Episode, EpisodePage, LibraryItem, PushedEvent, QueueItem, SearchResultItem};
pub use state::{
    AppState, DebounceTicket, Generation, SearchPhase, SearchSession, StreamId, StreamStatus,
};
pub use update::update;
pub use view_model::AppViewModel;
