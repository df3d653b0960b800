//! Line-oriented command parsing for the terminal front end.
//!
//! Plain text is a search term. Lines starting with `:` are commands; list
//! positions are 1-based as printed.

use podscribe_core::{EpisodeAction, Msg, ResultAction};

pub const HELP: &str = "\
Type to search podcasts. Commands:
  :add N                 add search result N to the library
  :episodes N            list episodes of search result N
  :podcast ID [PAGE]     list episodes of a podcast by id
  :queue N               queue episode N for transcription
  :transcribe N          transcribe episode N now
  :transcribe-url URL    transcribe an audio URL
  :stop                  stop following the transcription
  :library               show the library
  :remove ID             remove a podcast from the library
  :queue-list            show the transcription queue
  :unqueue ID            remove an episode from the queue
  :status ID STATUS      set a queued episode's status
  :export                export transcripts
  :help                  show this help
  :quit                  exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Send(Msg),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command :{0} (try :help)")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a list position (positions start at 1)")]
    BadPosition(String),
    #[error("'{0}' is not a page number")]
    BadPage(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Some(Command::Send(Msg::SearchInputChanged(line.to_string()))));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let msg = match (name, args.as_slice()) {
        ("help", []) => return Ok(Some(Command::Help)),
        ("quit" | "q", []) => return Ok(Some(Command::Quit)),
        ("add", [position]) => Msg::SearchResultChosen {
            index: position_index(position)?,
            action: ResultAction::AddToLibrary,
        },
        ("add", _) => return Err(InputError::Usage(":add N")),
        ("episodes", [position]) => Msg::SearchResultChosen {
            index: position_index(position)?,
            action: ResultAction::ShowEpisodes,
        },
        ("episodes", _) => return Err(InputError::Usage(":episodes N")),
        ("podcast", [podcast_id]) => Msg::EpisodesRequested {
            podcast_id: podcast_id.to_string(),
            page: 1,
        },
        ("podcast", [podcast_id, page]) => Msg::EpisodesRequested {
            podcast_id: podcast_id.to_string(),
            page: page_number(page)?,
        },
        ("podcast", _) => return Err(InputError::Usage(":podcast ID [PAGE]")),
        ("queue", [position]) => Msg::EpisodeChosen {
            index: position_index(position)?,
            action: EpisodeAction::Queue,
        },
        ("queue", _) => return Err(InputError::Usage(":queue N")),
        ("transcribe", [position]) => Msg::EpisodeChosen {
            index: position_index(position)?,
            action: EpisodeAction::Transcribe,
        },
        ("transcribe", _) => return Err(InputError::Usage(":transcribe N")),
        ("transcribe-url", [audio_url]) => Msg::TranscriptionRequested {
            audio_url: audio_url.to_string(),
        },
        ("transcribe-url", _) => return Err(InputError::Usage(":transcribe-url URL")),
        ("stop", []) => Msg::StopTranscription,
        ("library", []) => Msg::LibraryRequested,
        ("remove", [collection_id]) => Msg::RemoveFromLibrary {
            collection_id: collection_id.to_string(),
        },
        ("remove", _) => return Err(InputError::Usage(":remove ID")),
        ("queue-list", []) => Msg::QueueRequested,
        ("unqueue", [episode_id]) => Msg::RemoveFromQueue {
            episode_id: episode_id.to_string(),
        },
        ("unqueue", _) => return Err(InputError::Usage(":unqueue ID")),
        ("status", [episode_id, status]) => Msg::UpdateQueueStatus {
            episode_id: episode_id.to_string(),
            status: status.to_string(),
        },
        ("status", _) => return Err(InputError::Usage(":status ID STATUS")),
        ("export", []) => Msg::ExportTranscripts,
        _ => return Err(InputError::UnknownCommand(command.to_string())),
    };
    Ok(Some(Command::Send(msg)))
}

fn position_index(word: &str) -> Result<usize, InputError> {
    match word.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(InputError::BadPosition(word.to_string())),
    }
}

fn page_number(word: &str) -> Result<u32, InputError> {
    match word.parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(InputError::BadPage(word.to_string())),
    }
}
