//! User-visible texts emitted through `Presentation`.

use crate::{MutationKind, MutationOutcome};

pub const SEARCH_LOADING_MESSAGE: &str = "Searching... This may take up to 5 minutes.";
pub const SEARCH_TIMED_OUT_MESSAGE: &str =
    "Search request timed out after 5 minutes. Please try again.";
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching. Please try again.";
pub const START_FAILED_MESSAGE: &str = "Failed to start transcription";

pub(crate) fn mutation_message(
    kind: MutationKind,
    outcome: MutationOutcome,
    detail: Option<&str>,
) -> String {
    use MutationKind as K;
    use MutationOutcome as O;

    let text = match (kind, outcome) {
        (K::AddToLibrary, O::Success) => "Podcast added to library!",
        (K::AddToLibrary, O::Duplicate) => "This podcast is already in your library.",
        (K::AddToLibrary, O::Failed) => "Error adding podcast to library",
        (K::RemoveFromLibrary, O::Success | O::Duplicate) => "Podcast removed from library.",
        (K::RemoveFromLibrary, O::Failed) => "Error removing podcast from library",
        (K::AddToQueue, O::Success) => "Added to transcription queue!",
        (K::AddToQueue, O::Duplicate) => "This episode is already in the transcription queue.",
        (K::AddToQueue, O::Failed) => "Error adding episode to queue",
        (K::RemoveFromQueue, O::Success | O::Duplicate) => "Removed from transcription queue.",
        (K::RemoveFromQueue, O::Failed) => "Error removing episode from queue",
        (K::UpdateQueueStatus, O::Success | O::Duplicate) => "Queue status updated.",
        (K::UpdateQueueStatus, O::Failed) => "Error updating queue status",
        // The export endpoint reports its own summary.
        (K::ExportTranscripts, O::Success | O::Duplicate) => {
            return detail.unwrap_or("Transcripts exported.").to_string();
        }
        (K::ExportTranscripts, O::Failed) => {
            return detail.unwrap_or("Error exporting transcripts").to_string();
        }
    };
    text.to_string()
}
