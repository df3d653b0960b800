use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use podscribe_core::{DebounceTicket, Generation, MutationRequest, PushedEvent, StreamId};
use podscribe_logging::{scribe_debug, scribe_info};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{ApiError, EngineEvent, FailureKind, PodcastApi};

struct InFlightSearch {
    generation: Generation,
    cancel: CancellationToken,
}

struct StreamConnection {
    stream_id: StreamId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns every timer, request and connection the coordinator starts.
///
/// Completions are posted to the event channel; the engine never decides
/// what they mean. Must be used from inside a tokio runtime.
pub struct Engine {
    api: Arc<dyn PodcastApi>,
    events: UnboundedSender<EngineEvent>,
    debounce: Option<CancellationToken>,
    search: Option<InFlightSearch>,
    stream: Option<StreamConnection>,
}

impl Engine {
    pub fn new(api: Arc<dyn PodcastApi>, events: UnboundedSender<EngineEvent>) -> Self {
        Self {
            api,
            events,
            debounce: None,
            search: None,
            stream: None,
        }
    }

    /// Arms the quiet-period timer, replacing any timer still running.
    pub fn schedule_debounce(&mut self, ticket: DebounceTicket, delay: Duration) {
        if let Some(previous) = self.debounce.take() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        self.debounce = Some(cancel.clone());
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(EngineEvent::DebounceElapsed { ticket });
                }
            }
        });
    }

    /// Issues a search bounded by `timeout`. Exactly one `SearchCompleted`
    /// is posted for it, whatever the ending.
    pub fn search(&mut self, generation: Generation, term: String, timeout: Duration) {
        if let Some(previous) = self.search.take() {
            previous.cancel.cancel();
        }
        let cancel = CancellationToken::new();
        self.search = Some(InFlightSearch {
            generation,
            cancel: cancel.clone(),
        });
        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    Err(ApiError::new(FailureKind::Cancelled, "superseded"))
                }
                outcome = tokio::time::timeout(timeout, api.search_podcasts(&term)) => {
                    outcome.unwrap_or_else(|_| {
                        Err(ApiError::new(
                            FailureKind::Timeout,
                            format!("no response after {}s", timeout.as_secs()),
                        ))
                    })
                }
            };
            let _ = events.send(EngineEvent::SearchCompleted { generation, result });
        });
    }

    /// Cancels the search for `generation` if it is the one in flight.
    pub fn cancel_search(&mut self, generation: Generation) {
        match &self.search {
            Some(search) if search.generation == generation => {
                scribe_debug!("Cancelling search generation={}", generation);
                search.cancel.cancel();
                self.search = None;
            }
            _ => {}
        }
    }

    /// Forgets the search for `generation` once its completion has arrived.
    pub fn search_finished(&mut self, generation: Generation) {
        if self
            .search
            .as_ref()
            .is_some_and(|search| search.generation == generation)
        {
            self.search = None;
        }
    }

    pub fn search_in_flight(&self) -> Option<Generation> {
        self.search.as_ref().map(|search| search.generation)
    }

    pub fn start_transcription(&self, audio_url: String) {
        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.start_transcription(&audio_url).await;
            let _ = events.send(EngineEvent::TranscriptionStarted { result });
        });
    }

    /// Opens the event stream under `stream_id`. Any connection still held is
    /// closed first, so at most one is ever open.
    pub fn open_stream(&mut self, stream_id: StreamId) {
        if let Some(previous) = self.stream.take() {
            scribe_info!(
                "Closing event stream {} before opening {}",
                previous.stream_id,
                stream_id
            );
            shut_down(previous);
        }
        let cancel = CancellationToken::new();
        let task = tokio::spawn(read_stream(
            self.api.clone(),
            stream_id,
            cancel.clone(),
            self.events.clone(),
        ));
        self.stream = Some(StreamConnection {
            stream_id,
            cancel,
            task,
        });
    }

    /// Closes the connection for `stream_id`. Closing an already closed or
    /// replaced stream does nothing.
    pub fn close_stream(&mut self, stream_id: StreamId) {
        if self
            .stream
            .as_ref()
            .is_some_and(|connection| connection.stream_id == stream_id)
        {
            if let Some(connection) = self.stream.take() {
                scribe_info!("Closing event stream {}", stream_id);
                shut_down(connection);
            }
        }
    }

    /// Number of event-stream connections currently held open (0 or 1).
    pub fn open_stream_count(&self) -> usize {
        self.stream
            .as_ref()
            .filter(|connection| !connection.task.is_finished())
            .map_or(0, |_| 1)
    }

    pub fn mutate(&self, request: MutationRequest) {
        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let kind = request.kind();
            let result = api.mutate(&request).await;
            let _ = events.send(EngineEvent::MutationCompleted { kind, result });
        });
    }

    pub fn load_episodes(&self, podcast_id: String, page: u32) {
        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.podcast_episodes(&podcast_id, page).await;
            let _ = events.send(EngineEvent::EpisodesLoaded { result });
        });
    }

    pub fn load_library(&self) {
        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.library_items().await;
            let _ = events.send(EngineEvent::LibraryLoaded { result });
        });
    }

    pub fn load_queue(&self) {
        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.transcription_queue().await;
            let _ = events.send(EngineEvent::QueueLoaded { result });
        });
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(debounce) = self.debounce.take() {
            debounce.cancel();
        }
        if let Some(search) = self.search.take() {
            search.cancel.cancel();
        }
        if let Some(connection) = self.stream.take() {
            shut_down(connection);
        }
    }
}

fn shut_down(connection: StreamConnection) {
    connection.cancel.cancel();
    connection.task.abort();
}

async fn read_stream(
    api: Arc<dyn PodcastApi>,
    stream_id: StreamId,
    cancel: CancellationToken,
    events: UnboundedSender<EngineEvent>,
) {
    let opened = tokio::select! {
        _ = cancel.cancelled() => return,
        opened = api.open_event_stream() => opened,
    };
    let mut stream = match opened {
        Ok(stream) => stream,
        Err(error) => {
            let _ = events.send(EngineEvent::StreamFailed { stream_id, error });
            return;
        }
    };
    let _ = events.send(EngineEvent::StreamOpened { stream_id });

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = stream.next() => next,
        };
        match next {
            Some(Ok(event)) => {
                let fatal = matches!(event, PushedEvent::Error(_));
                let delivered = events
                    .send(EngineEvent::StreamEvent { stream_id, event })
                    .is_ok();
                if fatal || !delivered {
                    break;
                }
            }
            Some(Err(error)) => {
                let _ = events.send(EngineEvent::StreamFailed { stream_id, error });
                break;
            }
            None => {
                let _ = events.send(EngineEvent::StreamEnded { stream_id });
                break;
            }
        }
    }
    scribe_debug!("Event stream {} reader finished", stream_id);
}
