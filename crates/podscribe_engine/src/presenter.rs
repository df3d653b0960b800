use podscribe_core::{EpisodePage, LibraryItem, Presentation, QueueItem, SearchResultItem};

/// Output surface for everything the coordinator shows the user.
pub trait Presenter {
    fn show_search_status(&mut self, message: &str);
    fn show_search_results(&mut self, items: &[SearchResultItem]);
    fn show_episodes(&mut self, page: &EpisodePage);
    fn show_library(&mut self, items: &[LibraryItem]);
    fn show_queue(&mut self, items: &[QueueItem]);
    fn append_transcript(&mut self, text: &str);
    fn show_notice(&mut self, message: &str);
    fn show_error(&mut self, message: &str);
}

pub(crate) fn present(presenter: &mut dyn Presenter, presentation: Presentation) {
    match presentation {
        Presentation::SearchStatus(message) => presenter.show_search_status(&message),
        Presentation::SearchResults(items) => presenter.show_search_results(&items),
        Presentation::Episodes(page) => presenter.show_episodes(&page),
        Presentation::Library(items) => presenter.show_library(&items),
        Presentation::Queue(items) => presenter.show_queue(&items),
        Presentation::AppendTranscript(text) => presenter.append_transcript(&text),
        Presentation::Notice(message) => presenter.show_notice(&message),
        Presentation::Error(message) => presenter.show_error(&message),
    }
}
