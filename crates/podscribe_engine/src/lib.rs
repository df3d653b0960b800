//! Podscribe engine: HTTP/event-stream IO, timers and effect execution.
mod api;
mod coordinator;
mod engine;
mod presenter;
mod push;
mod runner;
mod sse;
mod token;
mod types;

pub use api::{ApiSettings, EndpointPaths, PodcastApi, PushedEventStream, ReqwestApi};
pub use coordinator::Coordinator;
pub use engine::Engine;
pub use presenter::Presenter;
pub use push::classify_pushed;
pub use runner::{engine_event_to_msg, EffectRunner};
pub use sse::{SseEvent, SseEventStream};
pub use token::{CookieTokenSource, StaticTokenSource, TokenSource};
pub use types::{ApiError, EngineEvent, FailureKind, StatusReply};
