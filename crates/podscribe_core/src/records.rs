//! Plain value records routed from server JSON to the presenter.
//!
//! Field names follow the wire format: search and episode items come from the
//! iTunes-shaped proxy endpoints (camelCase), library and queue items from the
//! server's own tables (snake_case).

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "collectionId", deserialize_with = "lenient_string")]
    pub collection_id: String,
    #[serde(rename = "collectionName", default, deserialize_with = "lenient_string")]
    pub collection_name: String,
    #[serde(rename = "artistName", default, deserialize_with = "lenient_string")]
    pub artist_name: String,
    #[serde(rename = "artworkUrl100", default, deserialize_with = "lenient_string")]
    pub artwork_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Episode {
    #[serde(rename = "trackId", deserialize_with = "lenient_string")]
    pub episode_id: String,
    #[serde(rename = "trackName", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "episodeUrl", default, deserialize_with = "lenient_string")]
    pub audio_url: String,
    #[serde(default)]
    pub duration_minutes: u64,
    #[serde(rename = "releaseDate", default, deserialize_with = "lenient_string")]
    pub release_date: String,
    #[serde(rename = "collectionName", default, deserialize_with = "lenient_string")]
    pub podcast_name: String,
}

/// One page of episodes as returned by the episode listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodePage {
    #[serde(default)]
    pub episodes: Vec<Episode>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryItem {
    #[serde(deserialize_with = "lenient_string")]
    pub collection_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub artist: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub artwork_url: String,
    #[serde(default)]
    pub feed_url: Option<String>,
}

impl From<&SearchResultItem> for LibraryItem {
    fn from(item: &SearchResultItem) -> Self {
        Self {
            collection_id: item.collection_id.clone(),
            name: item.collection_name.clone(),
            artist: item.artist_name.clone(),
            artwork_url: item.artwork_url.clone(),
            feed_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueItem {
    #[serde(deserialize_with = "lenient_string")]
    pub episode_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub episode_title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub podcast_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub publication_date: String,
    #[serde(default = "pending_status")]
    pub status: String,
}

impl From<&Episode> for QueueItem {
    fn from(episode: &Episode) -> Self {
        Self {
            episode_id: episode.episode_id.clone(),
            episode_title: episode.title.clone(),
            audio_url: episode.audio_url.clone(),
            podcast_name: episode.podcast_name.clone(),
            publication_date: episode.release_date.clone(),
            status: pending_status(),
        }
    }
}

/// A classified message pushed over the transcription event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushedEvent {
    Text(String),
    Error(String),
    /// A well-formed message whose `type` this client does not know.
    Unrecognized,
}

fn first_page() -> u32 {
    1
}

fn pending_status() -> String {
    "pending".to_string()
}

/// Accepts a JSON string, number or null. Upstream ids are numeric while the
/// server echoes them back as strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Integer(i64),
        Float(f64),
        Null,
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(text) => text,
        Lenient::Integer(value) => value.to_string(),
        Lenient::Float(value) => value.to_string(),
        Lenient::Null => String::new(),
    })
}
