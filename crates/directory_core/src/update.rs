use directory_logging::{dir_debug, dir_warn};

use crate::view_model::SEARCH_ERROR_MESSAGE;
use crate::location::parse_location;
use crate::{Effect, GalleryKey, Msg, SearchSession};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SearchSession, msg: Msg) -> (SearchSession, Vec<Effect>) {
    let effects = match msg {
        Msg::LocationLoaded(location) => {
            let params = parse_location(&location);
            if params.debug {
                state.enable_debug();
            }
            match params.query {
                Some(query) => {
                    state.set_input(query);
                    start_search(&mut state)
                }
                None => Vec::new(),
            }
        }
        Msg::InputChanged(text) => {
            let blank = text.trim().is_empty();
            state.set_input(text);
            if blank {
                let disarmed = state.disarm_debounce();
                state.show_prompt();
                if disarmed {
                    vec![Effect::CancelDebounce]
                } else {
                    Vec::new()
                }
            } else {
                // Immediate feedback while typing; the search itself waits.
                state.set_loading(true);
                let generation = state.arm_debounce();
                vec![Effect::ArmDebounce {
                    generation,
                    delay: state.config().debounce,
                }]
            }
        }
        Msg::SearchSubmitted => start_search(&mut state),
        Msg::DebounceElapsed { generation } => {
            if state.take_debounce(generation) {
                start_search(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::SearchCompleted { token, results } => {
            if token != state.current_token() {
                dir_debug!(
                    "Discarding {} results of stale search token={} current={}",
                    results.len(),
                    token,
                    state.current_token()
                );
                state.set_loading(false);
            } else {
                state.set_loading(false);
                state.apply_results(results);
            }
            Vec::new()
        }
        Msg::SearchFailed { token, message } => {
            if token == state.current_token() {
                dir_warn!("Search token={} failed: {}", token, message);
                state.set_loading(false);
                state.show_error(SEARCH_ERROR_MESSAGE);
            } else {
                dir_debug!("Ignoring failure of stale search token={}: {}", token, message);
            }
            Vec::new()
        }
        Msg::FilterSelected(filter) => {
            state.set_filter(filter);
            Vec::new()
        }
        Msg::ImageActivated { index } => {
            let items = state.displayed().gallery_items();
            if state.gallery_mut().open(items, index) {
                vec![Effect::SetScrollLocked(true)]
            } else {
                Vec::new()
            }
        }
        Msg::GalleryKey(key) => {
            if !state.gallery().is_open() {
                return (state, Vec::new());
            }
            match key {
                GalleryKey::Left => {
                    state.gallery_mut().prev();
                    Vec::new()
                }
                GalleryKey::Right => {
                    state.gallery_mut().next();
                    Vec::new()
                }
                GalleryKey::Escape => close_gallery(&mut state),
            }
        }
        Msg::GalleryNext => {
            state.gallery_mut().next();
            Vec::new()
        }
        Msg::GalleryPrev => {
            state.gallery_mut().prev();
            Vec::new()
        }
        Msg::GalleryCloseRequested => close_gallery(&mut state),
        Msg::GalleryDetachElapsed { generation } => {
            state.gallery_mut().finish_close(generation);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Starts a search for the current input. Always disarms a pending debounce
/// first so only one resolution path is ever armed.
fn start_search(state: &mut SearchSession) -> Vec<Effect> {
    let mut effects = Vec::new();
    if state.disarm_debounce() {
        effects.push(Effect::CancelDebounce);
    }

    let query = state.input().trim().to_lowercase();
    if query.is_empty() {
        state.show_prompt();
        return effects;
    }

    let token = state.begin_search(&query);
    if let Some(location) = state.location() {
        effects.push(Effect::PushLocation {
            location: location.to_string(),
        });
    }
    effects.push(Effect::RunSearch { token, query });
    effects
}

fn close_gallery(state: &mut SearchSession) -> Vec<Effect> {
    match state.gallery_mut().begin_close() {
        Some(generation) => vec![
            Effect::SetScrollLocked(false),
            Effect::ScheduleGalleryDetach {
                generation,
                delay: state.config().gallery_fade,
            },
        ],
        None => Vec::new(),
    }
}
