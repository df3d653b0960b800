mod common;

use common::{advance, Harness, ScriptedApi};
use podscribe_core::{
    Msg, Presentation, PushedEvent, StreamStatus, START_FAILED_MESSAGE, TRANSCRIPTION_STARTED,
};
use podscribe_engine::{ApiError, FailureKind};
use pretty_assertions::assert_eq;

const AUDIO_URL: &str = "https://cdn.example/episode-1.mp3";

fn request_transcription(harness: &Harness, audio_url: &str) {
    harness.send(Msg::TranscriptionRequested {
        audio_url: audio_url.to_string(),
    });
}

fn text(fragment: &str) -> Result<PushedEvent, ApiError> {
    Ok(PushedEvent::Text(fragment.to_string()))
}

#[tokio::test(start_paused = true)]
async fn fragments_are_appended_in_arrival_order() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let feed = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    assert_eq!(harness.api.start_calls(), vec![AUDIO_URL.to_string()]);
    assert_eq!(harness.api.open_streams(), 1);

    feed.send(text("hello")).unwrap();
    feed.send(text("world")).unwrap();
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![
            Presentation::AppendTranscript("hello ".to_string()),
            Presentation::AppendTranscript("world ".to_string()),
        ]
    );
    let coordinator = harness.finish().await;
    assert_eq!(coordinator.state().transcript(), "hello world ");
    assert_eq!(coordinator.state().stream_status(), StreamStatus::Open);
    assert_eq!(coordinator.engine().open_stream_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn other_start_status_reports_failure_without_connecting() {
    let api = ScriptedApi::new();
    api.reply_to_start("Queued");
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::Error(START_FAILED_MESSAGE.to_string())]
    );
    assert_eq!(harness.api.stream_requests(), 0);
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn start_request_failure_reports_failure() {
    // No scripted reply: the fake answers with a 500.
    let harness = Harness::start(ScriptedApi::new());

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::Error(START_FAILED_MESSAGE.to_string())]
    );
    assert_eq!(harness.api.stream_requests(), 0);
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn error_message_closes_stream_and_drops_the_rest() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let feed = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    feed.send(text("partial")).unwrap();
    feed.send(Ok(PushedEvent::Error("model crashed".to_string()))).unwrap();
    let _ = feed.send(text("ignored"));
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![
            Presentation::AppendTranscript("partial ".to_string()),
            Presentation::Error("Transcription error: model crashed".to_string()),
        ]
    );
    assert_eq!(harness.api.open_streams(), 0);
    assert!(feed.is_closed());

    let coordinator = harness.finish().await;
    assert_eq!(coordinator.state().stream_status(), StreamStatus::Closed);
    assert_eq!(coordinator.engine().open_stream_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn second_transcription_replaces_the_first_connection() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let first = api.script_stream();
    let second = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    request_transcription(&harness, "https://cdn.example/episode-2.mp3");
    advance(10).await;

    assert_eq!(harness.api.stream_requests(), 2);
    assert_eq!(harness.api.open_streams(), 1);
    assert!(first.is_closed());

    second.send(text("second")).unwrap();
    advance(10).await;
    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::AppendTranscript("second ".to_string())]
    );
    let coordinator = harness.finish().await;
    assert_eq!(coordinator.engine().open_stream_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_closes_the_connection_and_is_idempotent() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let feed = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    harness.send(Msg::StopTranscription);
    advance(10).await;
    harness.send(Msg::StopTranscription);
    advance(10).await;

    assert_eq!(harness.api.open_streams(), 0);
    assert!(feed.is_closed());
    assert!(harness.presenter.entries().is_empty());
    let coordinator = harness.finish().await;
    assert_eq!(coordinator.state().stream_status(), StreamStatus::Closed);
}

#[tokio::test(start_paused = true)]
async fn unknown_message_types_are_ignored() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let feed = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    feed.send(Ok(PushedEvent::Unrecognized)).unwrap();
    feed.send(text("kept")).unwrap();
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::AppendTranscript("kept ".to_string())]
    );
    assert_eq!(harness.api.open_streams(), 1);
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn server_hangup_is_reported_as_connection_error() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let feed = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    drop(feed);
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::Error(
            "Transcription stream connection error: closed by server".to_string()
        )]
    );
    let coordinator = harness.finish().await;
    assert_eq!(coordinator.state().stream_status(), StreamStatus::Closed);
}

#[tokio::test(start_paused = true)]
async fn refused_connection_closes_the_stream() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::Error(
            "Transcription stream connection error: network error: connection refused"
                .to_string()
        )]
    );
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn malformed_payload_is_reported_as_protocol_fault() {
    let api = ScriptedApi::new();
    api.reply_to_start(TRANSCRIPTION_STARTED);
    let feed = api.script_stream();
    let harness = Harness::start(api);

    request_transcription(&harness, AUDIO_URL);
    advance(10).await;
    feed.send(Err(ApiError::new(FailureKind::Protocol, "bad event payload")))
        .unwrap();
    advance(10).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![Presentation::Error(
            "Transcription stream malformed message: bad event payload".to_string()
        )]
    );
    assert_eq!(harness.api.open_streams(), 0);
    harness.finish().await;
}
