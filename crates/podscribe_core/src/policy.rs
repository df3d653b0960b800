use std::time::Duration;

/// Quiet window after the last keystroke before a search is issued.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Deadline for a single search request.
pub const SEARCH_TIMEOUT: Duration = Duration::from_millis(300_000);

/// The only start acknowledgment that opens the event stream.
pub const TRANSCRIPTION_STARTED: &str = "Transcription started";
