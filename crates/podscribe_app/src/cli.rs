use clap::{Parser, ValueEnum};
use log::LevelFilter;
use podscribe_engine::ApiSettings;
use podscribe_logging::LogDestination;

/// Podscribe - search podcasts and follow live transcriptions from the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the transcription server
    #[arg(long, env = "PODSCRIBE_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// Cookie header value holding the CSRF token (e.g. "csrftoken=...")
    #[arg(long, env = "PODSCRIBE_COOKIE")]
    pub cookie: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            ..ApiSettings::default()
        }
    }
}
