use crate::{LibraryItem, QueueItem};

/// Which mutating endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    AddToLibrary,
    RemoveFromLibrary,
    AddToQueue,
    RemoveFromQueue,
    UpdateQueueStatus,
    ExportTranscripts,
}

impl MutationKind {
    pub(crate) fn touches_library(self) -> bool {
        matches!(self, MutationKind::AddToLibrary | MutationKind::RemoveFromLibrary)
    }

    pub(crate) fn touches_queue(self) -> bool {
        matches!(
            self,
            MutationKind::AddToQueue
                | MutationKind::RemoveFromQueue
                | MutationKind::UpdateQueueStatus
        )
    }
}

/// A one-shot, user-initiated state change on the server. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    AddToLibrary(LibraryItem),
    RemoveFromLibrary { collection_id: String },
    AddToQueue(QueueItem),
    RemoveFromQueue { episode_id: String },
    UpdateQueueStatus { episode_id: String, status: String },
    ExportTranscripts,
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::AddToLibrary(_) => MutationKind::AddToLibrary,
            MutationRequest::RemoveFromLibrary { .. } => MutationKind::RemoveFromLibrary,
            MutationRequest::AddToQueue(_) => MutationKind::AddToQueue,
            MutationRequest::RemoveFromQueue { .. } => MutationKind::RemoveFromQueue,
            MutationRequest::UpdateQueueStatus { .. } => MutationKind::UpdateQueueStatus,
            MutationRequest::ExportTranscripts => MutationKind::ExportTranscripts,
        }
    }

    /// Identifier substituted into path templates (`{id}`).
    pub fn target_id(&self) -> Option<&str> {
        match self {
            MutationRequest::RemoveFromLibrary { collection_id } => Some(collection_id),
            _ => None,
        }
    }

    /// Form fields, in wire order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            MutationRequest::AddToLibrary(item) => vec![
                ("collection_id", item.collection_id.clone()),
                ("name", item.name.clone()),
                ("artist", item.artist.clone()),
                ("artwork_url", item.artwork_url.clone()),
            ],
            MutationRequest::AddToQueue(item) => vec![
                ("episode_id", item.episode_id.clone()),
                ("episode_title", item.episode_title.clone()),
                ("audio_url", item.audio_url.clone()),
                ("podcast_name", item.podcast_name.clone()),
                ("publication_date", item.publication_date.clone()),
            ],
            MutationRequest::RemoveFromQueue { episode_id } => {
                vec![("episode_id", episode_id.clone())]
            }
            MutationRequest::UpdateQueueStatus { episode_id, status } => vec![
                ("episode_id", episode_id.clone()),
                ("status", status.clone()),
            ],
            MutationRequest::RemoveFromLibrary { .. } | MutationRequest::ExportTranscripts => {
                Vec::new()
            }
        }
    }
}

/// Server-reported result of a mutation, reduced to what the UI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Success,
    /// Idempotent duplicate (`already_exists` / `already_in_queue`). Informational.
    Duplicate,
    Failed,
}

impl MutationOutcome {
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("success") => MutationOutcome::Success,
            Some("already_exists" | "already_in_queue") => MutationOutcome::Duplicate,
            _ => MutationOutcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_known_statuses() {
        assert_eq!(MutationOutcome::classify(Some("success")), MutationOutcome::Success);
        assert_eq!(
            MutationOutcome::classify(Some("already_exists")),
            MutationOutcome::Duplicate
        );
        assert_eq!(
            MutationOutcome::classify(Some("already_in_queue")),
            MutationOutcome::Duplicate
        );
        assert_eq!(MutationOutcome::classify(Some("error")), MutationOutcome::Failed);
        assert_eq!(MutationOutcome::classify(Some("Success")), MutationOutcome::Failed);
        assert_eq!(MutationOutcome::classify(None), MutationOutcome::Failed);
    }

    #[test]
    fn remove_from_library_carries_id_in_path_only() {
        let request = MutationRequest::RemoveFromLibrary {
            collection_id: "42".to_string(),
        };
        assert_eq!(request.target_id(), Some("42"));
        assert!(request.fields().is_empty());
        assert_eq!(request.kind(), MutationKind::RemoveFromLibrary);
    }
}
