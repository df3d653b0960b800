use std::io::Write;

use podscribe_core::{EpisodePage, LibraryItem, QueueItem, SearchResultItem};
use podscribe_engine::Presenter;
use podscribe_logging::scribe_warn;

/// Writes presentations as plain text. Transcript fragments are printed
/// inline; other output starts on a fresh line.
pub struct TerminalPresenter<W> {
    out: W,
    mid_line: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            mid_line: false,
        }
    }

    fn line(&mut self, text: &str) {
        let prefix = if std::mem::take(&mut self.mid_line) {
            "\n"
        } else {
            ""
        };
        if let Err(err) = writeln!(self.out, "{prefix}{text}") {
            scribe_warn!("Terminal write failed: {}", err);
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_search_status(&mut self, message: &str) {
        self.line(message);
    }

    fn show_search_results(&mut self, items: &[SearchResultItem]) {
        if items.is_empty() {
            self.line("No podcasts found.");
            return;
        }
        for (position, item) in items.iter().enumerate() {
            self.line(&format!(
                "{:>3}. {} by {} [{}]",
                position + 1,
                item.collection_name,
                item.artist_name,
                item.collection_id
            ));
        }
    }

    fn show_episodes(&mut self, page: &EpisodePage) {
        self.line(&format!("Page {} of {}", page.current_page, page.total_pages));
        for (position, episode) in page.episodes.iter().enumerate() {
            self.line(&format!(
                "{:>3}. {} ({} min, {})",
                position + 1,
                episode.title,
                episode.duration_minutes,
                episode.release_date
            ));
        }
        if page.has_next {
            self.line(&format!("More episodes: :podcast <id> {}", page.current_page + 1));
        }
    }

    fn show_library(&mut self, items: &[LibraryItem]) {
        if items.is_empty() {
            self.line("Library is empty.");
        }
        for item in items {
            self.line(&format!("[{}] {} by {}", item.collection_id, item.name, item.artist));
        }
    }

    fn show_queue(&mut self, items: &[QueueItem]) {
        if items.is_empty() {
            self.line("Transcription queue is empty.");
        }
        for item in items {
            self.line(&format!(
                "[{}] {} - {} ({})",
                item.episode_id, item.podcast_name, item.episode_title, item.status
            ));
        }
    }

    fn append_transcript(&mut self, text: &str) {
        self.mid_line = true;
        let written = write!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(err) = written {
            scribe_warn!("Terminal write failed: {}", err);
        }
    }

    fn show_notice(&mut self, message: &str) {
        self.line(message);
    }

    fn show_error(&mut self, message: &str) {
        self.line(&format!("error: {message}"));
    }
}
