mod common;

use std::time::Duration;

use common::{advance, podcast, Harness, ScriptedApi};
use podscribe_core::{
    Msg, Presentation, SearchPhase, SEARCH_FAILED_MESSAGE, SEARCH_LOADING_MESSAGE,
    SEARCH_TIMED_OUT_MESSAGE,
};
use podscribe_engine::{ApiError, FailureKind};
use pretty_assertions::assert_eq;

fn loading() -> Presentation {
    Presentation::SearchStatus(SEARCH_LOADING_MESSAGE.to_string())
}

#[tokio::test(start_paused = true)]
async fn keystrokes_inside_quiet_period_collapse_into_one_search() {
    let api = ScriptedApi::new();
    api.script_search("wow", Duration::ZERO, Ok(vec![podcast("1", "Wow Cast")]));
    let harness = Harness::start(api);

    harness.type_text("w");
    advance(100).await;
    harness.type_text("wo");
    advance(100).await;
    harness.type_text("wow");
    advance(250).await;
    assert!(harness.api.search_calls().is_empty());

    advance(100).await;
    assert_eq!(harness.api.search_calls(), vec!["wow".to_string()]);
    assert_eq!(
        harness.presenter.entries(),
        vec![
            loading(),
            Presentation::SearchResults(vec![podcast("1", "Wow Cast")]),
        ]
    );

    let coordinator = harness.finish().await;
    assert_eq!(coordinator.view().search_phase, SearchPhase::Completed);
    assert_eq!(coordinator.engine().search_in_flight(), None);
}

#[tokio::test(start_paused = true)]
async fn newer_search_cancels_and_hides_older_one() {
    let api = ScriptedApi::new();
    api.script_search("old", Duration::from_secs(1), Ok(vec![podcast("1", "Old")]));
    api.script_search("new", Duration::from_millis(100), Ok(vec![podcast("2", "New")]));
    let harness = Harness::start(api);

    harness.type_text("old");
    advance(400).await;
    assert_eq!(harness.api.search_calls(), vec!["old".to_string()]);

    harness.type_text("new");
    advance(2_000).await;

    assert_eq!(
        harness.api.search_calls(),
        vec!["old".to_string(), "new".to_string()]
    );
    assert_eq!(harness.api.abandoned_searches(), 1);
    assert_eq!(
        harness.presenter.entries(),
        vec![
            loading(),
            loading(),
            Presentation::SearchResults(vec![podcast("2", "New")]),
        ]
    );
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn typing_alone_does_not_cancel_the_running_search() {
    let api = ScriptedApi::new();
    api.script_search("slow", Duration::from_millis(500), Ok(vec![podcast("3", "Slow")]));
    let harness = Harness::start(api);

    harness.type_text("slow");
    advance(600).await;
    // The next search would start at 900ms; "slow" answers at 800ms.
    harness.type_text("slowe");
    advance(250).await;

    assert_eq!(harness.api.abandoned_searches(), 0);
    assert_eq!(
        harness.presenter.entries(),
        vec![
            loading(),
            Presentation::SearchResults(vec![podcast("3", "Slow")]),
        ]
    );

    advance(100).await;
    assert_eq!(
        harness.api.search_calls(),
        vec!["slow".to_string(), "slowe".to_string()]
    );
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn unanswered_search_times_out_after_five_minutes() {
    let api = ScriptedApi::new();
    api.script_search("stuck", Duration::from_secs(3_600), Ok(Vec::new()));
    let harness = Harness::start(api);

    harness.type_text("stuck");
    advance(300 + 299_000).await;
    assert_eq!(harness.presenter.entries(), vec![loading()]);

    advance(2_000).await;
    assert_eq!(
        harness.presenter.entries(),
        vec![
            loading(),
            Presentation::SearchStatus(SEARCH_TIMED_OUT_MESSAGE.to_string()),
        ]
    );
    assert_eq!(harness.api.abandoned_searches(), 1);

    let coordinator = harness.finish().await;
    assert_eq!(coordinator.view().search_phase, SearchPhase::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn failed_search_shows_generic_error() {
    let api = ScriptedApi::new();
    api.script_search(
        "boom",
        Duration::from_millis(10),
        Err(ApiError::new(FailureKind::HttpStatus(500), "Internal Server Error")),
    );
    let harness = Harness::start(api);

    harness.type_text("boom");
    advance(500).await;

    assert_eq!(
        harness.presenter.entries(),
        vec![
            loading(),
            Presentation::SearchStatus(SEARCH_FAILED_MESSAGE.to_string()),
        ]
    );
    let coordinator = harness.finish().await;
    assert_eq!(coordinator.view().search_phase, SearchPhase::Failed);
}

#[tokio::test(start_paused = true)]
async fn completed_search_is_no_longer_held_by_the_engine() {
    use std::sync::Arc;

    use common::RecordingPresenter;
    use podscribe_engine::{Coordinator, PodcastApi};

    let api = ScriptedApi::new();
    api.script_search("wow", Duration::from_millis(50), Ok(vec![podcast("1", "Wow Cast")]));
    let api: Arc<dyn PodcastApi> = Arc::new(api);
    let mut coordinator = Coordinator::new(api, RecordingPresenter::default());

    coordinator.dispatch(Msg::SearchInputChanged("wow".to_string()));
    advance(310).await;
    assert_eq!(coordinator.drain_engine_events(), 1);
    assert_eq!(coordinator.engine().search_in_flight(), Some(1));

    advance(60).await;
    assert_eq!(coordinator.drain_engine_events(), 1);
    assert_eq!(coordinator.engine().search_in_flight(), None);
    assert_eq!(coordinator.view().search_phase, SearchPhase::Completed);
}
