use std::time::Duration;

use directory_core::{Effect, Msg};
use directory_engine::{EngineEvent, EngineHandle, PreviewInput, SubmissionRequest};
use directory_logging::{dir_debug, dir_info, dir_warn};

/// Executes core effects against the engine and keeps the bits of
/// "browser" state the core only describes (location history, scroll lock).
pub struct EffectRunner {
    engine: EngineHandle,
    history: Vec<String>,
    scroll_locked: bool,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            history: Vec::new(),
            scroll_locked: false,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmDebounce { generation, delay } => {
                    self.engine.arm_debounce(generation, delay);
                }
                Effect::CancelDebounce => self.engine.cancel_debounce(),
                Effect::RunSearch { token, query } => {
                    dir_info!("RunSearch token={} query='{}'", token, query);
                    self.engine.search(token, query);
                }
                Effect::PushLocation { location } => {
                    dir_debug!("PushLocation {}", location);
                    if self.history.last() != Some(&location) {
                        self.history.push(location);
                    }
                }
                Effect::SetScrollLocked(locked) => self.scroll_locked = locked,
                Effect::ScheduleGalleryDetach { generation, delay } => {
                    self.engine.schedule_gallery_detach(generation, delay);
                }
            }
        }
    }

    pub fn submit(&self, request: SubmissionRequest) {
        self.engine.submit(request);
    }

    pub fn preview(&self, input: PreviewInput) {
        self.engine.preview(input);
    }

    pub fn next_event(&self, timeout: Duration) -> Option<EngineEvent> {
        self.engine.recv_timeout(timeout)
    }

    pub fn location(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}

/// Engine events that feed back into the search session.
pub fn event_to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::SearchCompleted { token, result } => Some(match result {
            Ok(results) => Msg::SearchCompleted { token, results },
            Err(err) => {
                dir_warn!("Search token={} failed: {}", token, err);
                Msg::SearchFailed {
                    token,
                    message: err.to_string(),
                }
            }
        }),
        EngineEvent::DebounceElapsed { generation } => Some(Msg::DebounceElapsed { generation }),
        EngineEvent::GalleryDetachElapsed { generation } => {
            Some(Msg::GalleryDetachElapsed { generation })
        }
        EngineEvent::SubmitFinished { .. }
        | EngineEvent::Preview(_)
        | EngineEvent::PreviewCleared => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_engine::SearchError;
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_search_maps_to_failure_message() {
        let msg = event_to_msg(EngineEvent::SearchCompleted {
            token: 4,
            result: Err(SearchError::Connectivity("refused".into())),
        });
        assert_eq!(
            msg,
            Some(Msg::SearchFailed {
                token: 4,
                message: "connection error: refused".into(),
            })
        );
        assert_eq!(event_to_msg(EngineEvent::PreviewCleared), None);
    }
}
