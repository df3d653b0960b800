#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use podscribe_core::{
    EpisodePage, LibraryItem, Msg, MutationRequest, Presentation, PushedEvent, QueueItem,
    SearchResultItem,
};
use podscribe_engine::{
    ApiError, Coordinator, FailureKind, PodcastApi, Presenter, PushedEventStream, StatusReply,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub type StreamSender = UnboundedSender<Result<PushedEvent, ApiError>>;

/// In-memory service whose replies and latencies are set up by each test.
#[derive(Default)]
pub struct ScriptedApi {
    searches: Mutex<HashMap<String, (Duration, Result<Vec<SearchResultItem>, ApiError>)>>,
    search_calls: Mutex<Vec<String>>,
    abandoned_searches: AtomicUsize,
    start_replies: Mutex<VecDeque<Result<StatusReply, ApiError>>>,
    start_calls: Mutex<Vec<String>>,
    streams: Mutex<VecDeque<UnboundedReceiver<Result<PushedEvent, ApiError>>>>,
    open_streams: Arc<AtomicUsize>,
    stream_requests: AtomicUsize,
    mutations: Mutex<Vec<MutationRequest>>,
    mutation_replies: Mutex<VecDeque<Result<StatusReply, ApiError>>>,
    library: Mutex<Vec<LibraryItem>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_search(
        &self,
        term: &str,
        delay: Duration,
        result: Result<Vec<SearchResultItem>, ApiError>,
    ) {
        self.searches
            .lock()
            .unwrap()
            .insert(term.to_string(), (delay, result));
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Searches whose future was dropped before it finished.
    pub fn abandoned_searches(&self) -> usize {
        self.abandoned_searches.load(Ordering::SeqCst)
    }

    pub fn reply_to_start(&self, status: &str) {
        self.start_replies.lock().unwrap().push_back(Ok(StatusReply {
            status: Some(status.to_string()),
            message: None,
        }));
    }

    pub fn start_calls(&self) -> Vec<String> {
        self.start_calls.lock().unwrap().clone()
    }

    /// Queues one event-stream connection and returns the handle that feeds it.
    /// Dropping the handle ends the stream.
    pub fn script_stream(&self) -> StreamSender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.streams.lock().unwrap().push_back(rx);
        tx
    }

    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    pub fn stream_requests(&self) -> usize {
        self.stream_requests.load(Ordering::SeqCst)
    }

    pub fn reply_to_mutation(&self, status: &str, message: Option<&str>) {
        self.mutation_replies.lock().unwrap().push_back(Ok(StatusReply {
            status: Some(status.to_string()),
            message: message.map(str::to_string),
        }));
    }

    pub fn mutations(&self) -> Vec<MutationRequest> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn set_library(&self, items: Vec<LibraryItem>) {
        *self.library.lock().unwrap() = items;
    }
}

struct AbandonGuard<'a> {
    counter: &'a AtomicUsize,
    finished: bool,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct ConnectionGuard(Arc<AtomicUsize>);

impl ConnectionGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PodcastApi for ScriptedApi {
    async fn search_podcasts(&self, term: &str) -> Result<Vec<SearchResultItem>, ApiError> {
        self.search_calls.lock().unwrap().push(term.to_string());
        let scripted = self.searches.lock().unwrap().get(term).cloned();
        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Ok(Vec::new())));
        let mut guard = AbandonGuard {
            counter: &self.abandoned_searches,
            finished: false,
        };
        tokio::time::sleep(delay).await;
        guard.finished = true;
        result
    }

    async fn podcast_episodes(&self, _podcast_id: &str, _page: u32) -> Result<EpisodePage, ApiError> {
        Err(ApiError::new(FailureKind::HttpStatus(404), "no episodes scripted"))
    }

    async fn start_transcription(&self, audio_url: &str) -> Result<StatusReply, ApiError> {
        self.start_calls.lock().unwrap().push(audio_url.to_string());
        let reply = self.start_replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Err(ApiError::new(FailureKind::HttpStatus(500), "no reply scripted")))
    }

    async fn open_event_stream(&self) -> Result<PushedEventStream, ApiError> {
        self.stream_requests.fetch_add(1, Ordering::SeqCst);
        let receiver = self.streams.lock().unwrap().pop_front();
        let Some(receiver) = receiver else {
            return Err(ApiError::new(FailureKind::Transport, "connection refused"));
        };
        let guard = ConnectionGuard::new(self.open_streams.clone());
        Ok(Box::pin(futures_util::stream::unfold(
            (receiver, guard),
            |(mut receiver, guard)| async move {
                let item = receiver.recv().await?;
                Some((item, (receiver, guard)))
            },
        )))
    }

    async fn mutate(&self, request: &MutationRequest) -> Result<StatusReply, ApiError> {
        self.mutations.lock().unwrap().push(request.clone());
        let reply = self.mutation_replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Err(ApiError::new(FailureKind::Transport, "no reply scripted")))
    }

    async fn library_items(&self) -> Result<Vec<LibraryItem>, ApiError> {
        Ok(self.library.lock().unwrap().clone())
    }

    async fn transcription_queue(&self) -> Result<Vec<QueueItem>, ApiError> {
        Ok(Vec::new())
    }
}

/// Records every presentation in order; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    log: Arc<Mutex<Vec<Presentation>>>,
}

impl RecordingPresenter {
    pub fn entries(&self) -> Vec<Presentation> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, presentation: Presentation) {
        self.log.lock().unwrap().push(presentation);
    }
}

impl Presenter for RecordingPresenter {
    fn show_search_status(&mut self, message: &str) {
        self.push(Presentation::SearchStatus(message.to_string()));
    }

    fn show_search_results(&mut self, items: &[SearchResultItem]) {
        self.push(Presentation::SearchResults(items.to_vec()));
    }

    fn show_episodes(&mut self, page: &EpisodePage) {
        self.push(Presentation::Episodes(page.clone()));
    }

    fn show_library(&mut self, items: &[LibraryItem]) {
        self.push(Presentation::Library(items.to_vec()));
    }

    fn show_queue(&mut self, items: &[QueueItem]) {
        self.push(Presentation::Queue(items.to_vec()));
    }

    fn append_transcript(&mut self, text: &str) {
        self.push(Presentation::AppendTranscript(text.to_string()));
    }

    fn show_notice(&mut self, message: &str) {
        self.push(Presentation::Notice(message.to_string()));
    }

    fn show_error(&mut self, message: &str) {
        self.push(Presentation::Error(message.to_string()));
    }
}

/// A coordinator running on its own task, fed through an inbox.
pub struct Harness {
    pub api: Arc<ScriptedApi>,
    pub presenter: RecordingPresenter,
    inbox: UnboundedSender<Msg>,
    task: JoinHandle<Coordinator<RecordingPresenter>>,
}

impl Harness {
    pub fn start(api: ScriptedApi) -> Self {
        podscribe_logging::initialize_for_tests();
        let api = Arc::new(api);
        let presenter = RecordingPresenter::default();
        let shared: Arc<dyn PodcastApi> = api.clone();
        let coordinator = Coordinator::new(shared, presenter.clone());
        let (inbox, inbox_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(coordinator.run(inbox_rx));
        Self {
            api,
            presenter,
            inbox,
            task,
        }
    }

    pub fn send(&self, msg: Msg) {
        self.inbox.send(msg).unwrap();
    }

    pub fn type_text(&self, text: &str) {
        self.send(Msg::SearchInputChanged(text.to_string()));
    }

    pub async fn finish(self) -> Coordinator<RecordingPresenter> {
        drop(self.inbox);
        self.task.await.unwrap()
    }
}

pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

pub fn podcast(id: &str, name: &str) -> SearchResultItem {
    SearchResultItem {
        collection_id: id.to_string(),
        collection_name: name.to_string(),
        artist_name: "Someone".to_string(),
        artwork_url: format!("https://img.example/{id}.jpg"),
    }
}
