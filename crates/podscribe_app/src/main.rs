mod cli;
mod input;
mod presenter;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use podscribe_engine::{CookieTokenSource, Coordinator, PodcastApi, ReqwestApi};
use podscribe_logging::{scribe_info, scribe_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::Cli;
use crate::input::{parse_line, Command, HELP};
use crate::presenter::TerminalPresenter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    podscribe_logging::initialize(cli.log.into(), cli.log_level());

    let settings = cli.api_settings();
    scribe_info!("Connecting to {}", settings.base_url);
    let tokens = Arc::new(CookieTokenSource::new(cli.cookie.clone().unwrap_or_default()));
    let api: Arc<dyn PodcastApi> =
        Arc::new(ReqwestApi::new(settings, tokens).context("building HTTP client")?);

    let (inbox, inbox_rx) = mpsc::unbounded_channel();
    let coordinator = tokio::spawn(
        Coordinator::new(api, TerminalPresenter::new(std::io::stdout())).run(inbox_rx),
    );

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading input")? {
        match parse_line(&line) {
            Ok(Some(Command::Send(msg))) => {
                if inbox.send(msg).is_err() {
                    scribe_warn!("Coordinator stopped; ignoring further input");
                    break;
                }
            }
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Quit)) => break,
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
    }

    drop(inbox);
    coordinator.await.context("coordinator task failed")?;
    Ok(())
}
