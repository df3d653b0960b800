use std::sync::Arc;

use podscribe_core::{update, AppState, AppViewModel, Msg};
use podscribe_logging::{scribe_debug, scribe_info, scribe_warn};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{engine_event_to_msg, EffectRunner, Engine, EngineEvent, PodcastApi, Presenter};

/// Single owner of [`AppState`]. User messages and engine completions are
/// applied one at a time, in arrival order.
pub struct Coordinator<P> {
    state: AppState,
    runner: EffectRunner,
    presenter: P,
    events: UnboundedReceiver<EngineEvent>,
}

impl<P: Presenter> Coordinator<P> {
    /// Must be called inside a tokio runtime.
    pub fn new(api: Arc<dyn PodcastApi>, presenter: P) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(Engine::new(api, event_tx)),
            presenter,
            events,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn engine(&self) -> &Engine {
        self.runner.engine()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects, &mut self.presenter);
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if let EngineEvent::SearchCompleted { generation, .. } = &event {
            self.runner.engine_mut().search_finished(*generation);
        }
        if let EngineEvent::SearchCompleted {
            generation,
            result: Err(err),
        } = &event
        {
            if self.state.live_search().map(|session| session.generation) == Some(*generation) {
                scribe_warn!("Search generation={} failed: {}", generation, err);
            } else {
                scribe_debug!("Discarding stale search outcome generation={}", generation);
            }
        }
        self.dispatch(engine_event_to_msg(event));
    }

    /// Applies engine completions that have already arrived, without waiting.
    pub fn drain_engine_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_engine_event(event);
            handled += 1;
        }
        handled
    }

    /// Runs until `inbox` closes, then hands the coordinator back.
    pub async fn run(mut self, mut inbox: UnboundedReceiver<Msg>) -> Self {
        scribe_info!("Coordinator started");
        loop {
            tokio::select! {
                msg = inbox.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
                Some(event) = self.events.recv() => self.handle_engine_event(event),
            }
        }
        scribe_info!("Coordinator stopped");
        self
    }
}
