use podscribe_core::{
    Effect, LoadTarget, Msg, MutationOutcome, SearchOutcome, StreamFault, TRANSCRIPTION_STARTED,
};
use podscribe_logging::{scribe_info, scribe_warn};

use crate::presenter::{present, Presenter};
use crate::{ApiError, Engine, EngineEvent, FailureKind};

/// Carries out the effects produced by `update`, in order.
pub struct EffectRunner {
    engine: Engine,
}

impl EffectRunner {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn run(&mut self, effects: Vec<Effect>, presenter: &mut dyn Presenter) {
        for effect in effects {
            match effect {
                Effect::ScheduleDebounce { ticket, delay } => {
                    self.engine.schedule_debounce(ticket, delay);
                }
                Effect::IssueSearch {
                    generation,
                    term,
                    timeout,
                } => {
                    scribe_info!(
                        "IssueSearch generation={} term_len={} term={}",
                        generation,
                        term.len(),
                        term
                    );
                    self.engine.search(generation, term, timeout);
                }
                Effect::CancelSearch { generation } => self.engine.cancel_search(generation),
                Effect::StartTranscription { audio_url } => {
                    scribe_info!("StartTranscription audio_url={}", audio_url);
                    self.engine.start_transcription(audio_url);
                }
                Effect::OpenStream { stream_id } => self.engine.open_stream(stream_id),
                Effect::CloseStream { stream_id } => self.engine.close_stream(stream_id),
                Effect::Mutate(request) => {
                    scribe_info!("Mutate kind={:?}", request.kind());
                    self.engine.mutate(request);
                }
                Effect::LoadEpisodes { podcast_id, page } => {
                    self.engine.load_episodes(podcast_id, page);
                }
                Effect::LoadLibrary => self.engine.load_library(),
                Effect::LoadQueue => self.engine.load_queue(),
                Effect::Present(presentation) => present(presenter, presentation),
            }
        }
    }
}

/// Translates an engine completion into the message `update` understands.
pub fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::DebounceElapsed { ticket } => Msg::DebounceElapsed { ticket },
        EngineEvent::SearchCompleted { generation, result } => Msg::SearchFinished {
            generation,
            outcome: match result {
                Ok(items) => SearchOutcome::Completed(items),
                Err(err) => match err.kind {
                    FailureKind::Timeout => SearchOutcome::TimedOut,
                    FailureKind::Cancelled => SearchOutcome::Cancelled,
                    _ => SearchOutcome::Failed,
                },
            },
        },
        EngineEvent::TranscriptionStarted { result } => match result {
            Ok(reply) => {
                if reply.status.as_deref() != Some(TRANSCRIPTION_STARTED) {
                    scribe_warn!("Transcription not started; server said {:?}", reply.status);
                }
                Msg::TranscriptionStartAcked {
                    status: reply.status,
                }
            }
            Err(err) => {
                scribe_warn!("Start transcription failed: {}", err);
                Msg::TranscriptionStartFailed {
                    reason: err.to_string(),
                }
            }
        },
        EngineEvent::StreamOpened { stream_id } => Msg::StreamOpened { stream_id },
        EngineEvent::StreamEvent { stream_id, event } => Msg::StreamEvent { stream_id, event },
        EngineEvent::StreamFailed { stream_id, error } => Msg::StreamFailed {
            stream_id,
            fault: stream_fault(error),
        },
        EngineEvent::StreamEnded { stream_id } => Msg::StreamFailed {
            stream_id,
            fault: StreamFault::Transport("closed by server".to_string()),
        },
        EngineEvent::MutationCompleted { kind, result } => match result {
            Ok(reply) => Msg::MutationFinished {
                kind,
                outcome: MutationOutcome::classify(reply.status.as_deref()),
                detail: reply.message,
            },
            Err(err) => {
                scribe_warn!("Mutation {:?} failed: {}", kind, err);
                Msg::MutationFinished {
                    kind,
                    outcome: MutationOutcome::Failed,
                    detail: None,
                }
            }
        },
        EngineEvent::EpisodesLoaded { result } => {
            loaded(result, LoadTarget::Episodes, Msg::EpisodesLoaded)
        }
        EngineEvent::LibraryLoaded { result } => {
            loaded(result, LoadTarget::Library, Msg::LibraryLoaded)
        }
        EngineEvent::QueueLoaded { result } => loaded(result, LoadTarget::Queue, Msg::QueueLoaded),
    }
}

fn stream_fault(error: ApiError) -> StreamFault {
    match error.kind {
        FailureKind::Protocol => StreamFault::Protocol(error.message),
        _ => StreamFault::Transport(error.to_string()),
    }
}

fn loaded<T>(result: Result<T, ApiError>, what: LoadTarget, on_success: fn(T) -> Msg) -> Msg {
    match result {
        Ok(value) => on_success(value),
        Err(err) => {
            scribe_warn!("Loading {} failed: {}", what, err);
            Msg::LoadFailed {
                what,
                reason: err.to_string(),
            }
        }
    }
}
