use crate::messages::mutation_message;
use crate::{
    AppState, Effect, EpisodeAction, LibraryItem, Msg, MutationOutcome, MutationRequest,
    Presentation, PushedEvent, QueueItem, ResultAction, SearchOutcome, SearchPhase,
    DEBOUNCE_INTERVAL, SEARCH_FAILED_MESSAGE, SEARCH_LOADING_MESSAGE, SEARCH_TIMED_OUT_MESSAGE,
    SEARCH_TIMEOUT, START_FAILED_MESSAGE, TRANSCRIPTION_STARTED,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchInputChanged(term) => {
            let ticket = state.begin_debounce(term);
            vec![Effect::ScheduleDebounce {
                ticket,
                delay: DEBOUNCE_INTERVAL,
            }]
        }
        Msg::DebounceElapsed { ticket } => {
            let Some(term) = state.take_pending_search(ticket) else {
                return (state, Vec::new());
            };
            let superseded = state.live_search().map(|session| session.generation);
            let generation = state.start_search(term.clone());

            let mut effects = Vec::with_capacity(3);
            if let Some(previous) = superseded {
                effects.push(Effect::CancelSearch {
                    generation: previous,
                });
            }
            // Loading text goes out before the request so it is visible immediately.
            effects.push(present(Presentation::SearchStatus(
                SEARCH_LOADING_MESSAGE.to_string(),
            )));
            effects.push(Effect::IssueSearch {
                generation,
                term,
                timeout: SEARCH_TIMEOUT,
            });
            effects
        }
        Msg::SearchFinished {
            generation,
            outcome,
        } => {
            // Stale sessions never reach the presenter.
            if !state.is_live_search(generation) {
                return (state, Vec::new());
            }
            match outcome {
                SearchOutcome::Completed(items) => {
                    state.finish_search(SearchPhase::Completed);
                    state.set_results(items.clone());
                    vec![present(Presentation::SearchResults(items))]
                }
                SearchOutcome::TimedOut => {
                    state.finish_search(SearchPhase::TimedOut);
                    vec![search_status(SEARCH_TIMED_OUT_MESSAGE)]
                }
                SearchOutcome::Failed => {
                    state.finish_search(SearchPhase::Failed);
                    vec![search_status(SEARCH_FAILED_MESSAGE)]
                }
                SearchOutcome::Cancelled => {
                    state.finish_search(SearchPhase::Cancelled);
                    Vec::new()
                }
            }
        }
        Msg::SearchResultChosen { index, action } => {
            let Some(item) = state.search_results().get(index).cloned() else {
                return (state, vec![missing_entry("search result", index)]);
            };
            match action {
                ResultAction::AddToLibrary => {
                    vec![Effect::Mutate(MutationRequest::AddToLibrary(
                        LibraryItem::from(&item),
                    ))]
                }
                ResultAction::ShowEpisodes => vec![Effect::LoadEpisodes {
                    podcast_id: item.collection_id,
                    page: 1,
                }],
            }
        }
        Msg::EpisodesRequested { podcast_id, page } => {
            vec![Effect::LoadEpisodes { podcast_id, page }]
        }
        Msg::EpisodesLoaded(page) => {
            state.set_episodes(page.clone());
            vec![present(Presentation::Episodes(page))]
        }
        Msg::EpisodeChosen { index, action } => {
            let Some(episode) = state
                .episodes()
                .and_then(|page| page.episodes.get(index))
                .cloned()
            else {
                return (state, vec![missing_entry("episode", index)]);
            };
            match action {
                EpisodeAction::Queue => vec![Effect::Mutate(MutationRequest::AddToQueue(
                    QueueItem::from(&episode),
                ))],
                EpisodeAction::Transcribe => vec![Effect::StartTranscription {
                    audio_url: episode.audio_url,
                }],
            }
        }
        Msg::TranscriptionRequested { audio_url } => {
            vec![Effect::StartTranscription { audio_url }]
        }
        Msg::TranscriptionStartAcked { status } => {
            if status.as_deref() == Some(TRANSCRIPTION_STARTED) {
                let (stream_id, previous) = state.begin_stream();
                let mut effects = Vec::with_capacity(2);
                if let Some(previous) = previous {
                    effects.push(Effect::CloseStream {
                        stream_id: previous,
                    });
                }
                effects.push(Effect::OpenStream { stream_id });
                effects
            } else {
                vec![present(Presentation::Error(START_FAILED_MESSAGE.to_string()))]
            }
        }
        Msg::TranscriptionStartFailed { .. } => {
            vec![present(Presentation::Error(START_FAILED_MESSAGE.to_string()))]
        }
        Msg::StreamOpened { stream_id } => {
            state.mark_stream_open(stream_id);
            Vec::new()
        }
        Msg::StreamEvent { stream_id, event } => {
            if !state.accepts_stream(stream_id) {
                return (state, Vec::new());
            }
            match event {
                PushedEvent::Text(text) => {
                    let chunk = format!("{text} ");
                    state.append_transcript(&chunk);
                    vec![present(Presentation::AppendTranscript(chunk))]
                }
                PushedEvent::Error(message) => {
                    close_stream_with(&mut state, format!("Transcription error: {message}"))
                }
                PushedEvent::Unrecognized => Vec::new(),
            }
        }
        Msg::StreamFailed { stream_id, fault } => {
            if !state.accepts_stream(stream_id) {
                return (state, Vec::new());
            }
            close_stream_with(&mut state, format!("Transcription stream {fault}"))
        }
        Msg::StopTranscription => match state.close_stream() {
            Some(stream_id) => vec![Effect::CloseStream { stream_id }],
            None => Vec::new(),
        },
        Msg::AddToLibrary(item) => vec![Effect::Mutate(MutationRequest::AddToLibrary(item))],
        Msg::RemoveFromLibrary { collection_id } => {
            vec![Effect::Mutate(MutationRequest::RemoveFromLibrary {
                collection_id,
            })]
        }
        Msg::AddToQueue(item) => vec![Effect::Mutate(MutationRequest::AddToQueue(item))],
        Msg::RemoveFromQueue { episode_id } => {
            vec![Effect::Mutate(MutationRequest::RemoveFromQueue { episode_id })]
        }
        Msg::UpdateQueueStatus { episode_id, status } => {
            vec![Effect::Mutate(MutationRequest::UpdateQueueStatus {
                episode_id,
                status,
            })]
        }
        Msg::ExportTranscripts => vec![Effect::Mutate(MutationRequest::ExportTranscripts)],
        Msg::MutationFinished {
            kind,
            outcome,
            detail,
        } => {
            let text = mutation_message(kind, outcome, detail.as_deref());
            let mut effects = Vec::with_capacity(2);
            effects.push(present(match outcome {
                MutationOutcome::Success | MutationOutcome::Duplicate => {
                    Presentation::Notice(text)
                }
                MutationOutcome::Failed => Presentation::Error(text),
            }));
            if outcome == MutationOutcome::Success {
                if kind.touches_library() {
                    effects.push(Effect::LoadLibrary);
                } else if kind.touches_queue() {
                    effects.push(Effect::LoadQueue);
                }
            }
            effects
        }
        Msg::LibraryRequested => vec![Effect::LoadLibrary],
        Msg::LibraryLoaded(items) => {
            state.set_library(items.clone());
            vec![present(Presentation::Library(items))]
        }
        Msg::QueueRequested => vec![Effect::LoadQueue],
        Msg::QueueLoaded(items) => {
            state.set_queue(items.clone());
            vec![present(Presentation::Queue(items))]
        }
        Msg::LoadFailed { what, reason } => vec![present(Presentation::Error(format!(
            "Could not load {what}: {reason}"
        )))],
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn present(presentation: Presentation) -> Effect {
    Effect::Present(presentation)
}

fn search_status(text: &str) -> Effect {
    present(Presentation::SearchStatus(text.to_string()))
}

fn missing_entry(what: &str, index: usize) -> Effect {
    present(Presentation::Error(format!("No {what} at position {index}")))
}

fn close_stream_with(state: &mut AppState, error: String) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(stream_id) = state.close_stream() {
        effects.push(Effect::CloseStream { stream_id });
    }
    effects.push(present(Presentation::Error(error)));
    effects
}
