use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{future, Stream, StreamExt};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use podscribe_core::{
    EpisodePage, LibraryItem, MutationKind, MutationRequest, PushedEvent, QueueItem,
    SearchResultItem,
};
use podscribe_logging::{scribe_debug, scribe_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::push::classify_pushed;
use crate::sse::SseEventStream;
use crate::token::TokenSource;
use crate::{ApiError, FailureKind, StatusReply};

/// Classified messages from the transcription event stream.
pub type PushedEventStream = Pin<Box<dyn Stream<Item = Result<PushedEvent, ApiError>> + Send>>;

/// Server routes, relative to [`ApiSettings::base_url`]. `{id}` is substituted.
#[derive(Debug, Clone)]
pub struct EndpointPaths {
    pub search: String,
    pub episodes: String,
    pub start_transcription: String,
    pub events: String,
    pub add_to_queue: String,
    pub remove_from_queue: String,
    pub update_queue_status: String,
    pub queue: String,
    pub add_to_library: String,
    pub remove_from_library: String,
    pub library_items: String,
    pub export_transcripts: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            search: "/search-podcasts/".to_string(),
            episodes: "/get_podcast_episodes/".to_string(),
            start_transcription: "/start_transcription/".to_string(),
            events: "/sse/".to_string(),
            add_to_queue: "/add_to_queue/".to_string(),
            remove_from_queue: "/remove_from_queue/".to_string(),
            update_queue_status: "/update_queue_status/".to_string(),
            queue: "/get_queue/".to_string(),
            add_to_library: "/add_to_library/".to_string(),
            remove_from_library: "/remove_from_library/{id}/".to_string(),
            library_items: "/get_library_items/".to_string(),
            export_transcripts: "/export_transcripts/".to_string(),
        }
    }
}

impl EndpointPaths {
    fn mutation_path(&self, request: &MutationRequest) -> String {
        let template = match request.kind() {
            MutationKind::AddToLibrary => &self.add_to_library,
            MutationKind::RemoveFromLibrary => &self.remove_from_library,
            MutationKind::AddToQueue => &self.add_to_queue,
            MutationKind::RemoveFromQueue => &self.remove_from_queue,
            MutationKind::UpdateQueueStatus => &self.update_queue_status,
            MutationKind::ExportTranscripts => &self.export_transcripts,
        };
        match request.target_id() {
            Some(id) => {
                template.replace("{id}", &utf8_percent_encode(id, NON_ALPHANUMERIC).to_string())
            }
            None => template.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Cookie the cross-site token is read from.
    pub csrf_cookie_name: String,
    /// Header the cross-site token is sent in.
    pub csrf_header: String,
    pub paths: EndpointPaths,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            paths: EndpointPaths::default(),
        }
    }
}

/// The remote podcast/transcription service.
#[async_trait::async_trait]
pub trait PodcastApi: Send + Sync {
    async fn search_podcasts(&self, term: &str) -> Result<Vec<SearchResultItem>, ApiError>;

    async fn podcast_episodes(&self, podcast_id: &str, page: u32) -> Result<EpisodePage, ApiError>;

    async fn start_transcription(&self, audio_url: &str) -> Result<StatusReply, ApiError>;

    /// Opens the long-lived event stream. Dropping the stream closes the connection.
    async fn open_event_stream(&self) -> Result<PushedEventStream, ApiError>;

    async fn mutate(&self, request: &MutationRequest) -> Result<StatusReply, ApiError>;

    async fn library_items(&self) -> Result<Vec<LibraryItem>, ApiError>;

    async fn transcription_queue(&self) -> Result<Vec<QueueItem>, ApiError>;
}

pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Transport, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            tokens,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.settings.base_url.trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_body(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        scribe_debug!("GET {}", url.path());
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        read_success_body(response).await
    }

    async fn post_form(&self, path: &str, fields: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path)?;
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields.iter().map(|(name, value)| (*name, value.as_str())))
            .finish();
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);
        match self.tokens.lookup(&self.settings.csrf_cookie_name) {
            Some(token) => request = request.header(self.settings.csrf_header.as_str(), token),
            None => scribe_warn!(
                "No {} token available; sending POST {} without it",
                self.settings.csrf_cookie_name,
                path
            ),
        }
        scribe_debug!("POST {} fields={}", path, fields.len());
        let response = request.send().await.map_err(map_reqwest_error)?;
        read_success_body(response).await
    }
}

#[async_trait::async_trait]
impl PodcastApi for ReqwestApi {
    async fn search_podcasts(&self, term: &str) -> Result<Vec<SearchResultItem>, ApiError> {
        let mut url = self.url(&self.settings.paths.search)?;
        url.query_pairs_mut().append_pair("q", term);
        let body = self.get_body(url).await?;
        parse_list(&body, "podcasts")
    }

    async fn podcast_episodes(&self, podcast_id: &str, page: u32) -> Result<EpisodePage, ApiError> {
        let mut url = self.url(&self.settings.paths.episodes)?;
        url.query_pairs_mut()
            .append_pair("podcast_id", podcast_id)
            .append_pair("page", &page.to_string());
        let body = self.get_body(url).await?;
        decode_json(&body)
    }

    async fn start_transcription(&self, audio_url: &str) -> Result<StatusReply, ApiError> {
        let fields = [("audio_url", audio_url.to_string())];
        let body = self
            .post_form(&self.settings.paths.start_transcription, &fields)
            .await?;
        decode_json(&body)
    }

    async fn open_event_stream(&self) -> Result<PushedEventStream, ApiError> {
        let url = self.url(&self.settings.paths.events)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let events = SseEventStream::new(response.bytes_stream()).filter_map(|item| {
            future::ready(match item {
                Ok(event) if is_message(&event) => Some(classify_pushed(&event.data)),
                Ok(_) => None,
                Err(err) => Some(Err(map_reqwest_error(err))),
            })
        });
        Ok(Box::pin(events))
    }

    async fn mutate(&self, request: &MutationRequest) -> Result<StatusReply, ApiError> {
        let path = self.settings.paths.mutation_path(request);
        let body = self.post_form(&path, &request.fields()).await?;
        match decode_json::<StatusReply>(&body) {
            // The library removal route answers with a redirect to a page, not JSON.
            Err(_) if request.kind() == MutationKind::RemoveFromLibrary => Ok(StatusReply {
                status: Some("success".to_string()),
                message: None,
            }),
            other => other,
        }
    }

    async fn library_items(&self) -> Result<Vec<LibraryItem>, ApiError> {
        let url = self.url(&self.settings.paths.library_items)?;
        let body = self.get_body(url).await?;
        parse_list(&body, "library_items")
    }

    async fn transcription_queue(&self) -> Result<Vec<QueueItem>, ApiError> {
        let url = self.url(&self.settings.paths.queue)?;
        let body = self.get_body(url).await?;
        parse_list(&body, "queue")
    }
}

/// Only unnamed (`message`) events with data are delivered, as a browser would.
fn is_message(event: &crate::SseEvent) -> bool {
    !event.data.is_empty() && event.event.as_deref().is_none_or(|name| name == "message")
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    Ok(bytes.to_vec())
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::new(FailureKind::Protocol, format!("unexpected response: {err}")))
}

/// Reads the array under `field`. A missing array yields an empty list;
/// entries that do not decode are skipped.
fn parse_list<T: DeserializeOwned>(body: &[u8], field: &str) -> Result<Vec<T>, ApiError> {
    let value: Value = decode_json(body)?;
    let Some(entries) = value.get(field).and_then(Value::as_array) else {
        scribe_warn!("Response has no `{}` array; treating it as empty", field);
        return Ok(Vec::new());
    };
    Ok(entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => Some(item),
            Err(err) => {
                scribe_warn!("Skipping malformed `{}` entry: {}", field, err);
                None
            }
        })
        .collect())
}

/// Client-level timeouts (connect) are connection failures. Only the search
/// deadline in the engine reports [`FailureKind::Timeout`].
fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        return ApiError::new(FailureKind::Protocol, err.to_string());
    }
    ApiError::new(FailureKind::Transport, err.to_string())
}
