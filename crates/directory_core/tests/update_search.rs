use std::sync::Once;
use std::time::Duration;

use directory_core::{
    update, Effect, Msg, NormalizedResult, ResultType, ResultsView, SearchSession, SearchToken,
    SEARCH_ERROR_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(directory_logging::initialize_for_tests);
}

fn submit(state: SearchSession, input: &str) -> (SearchSession, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SearchSubmitted)
}

fn token_of(effects: &[Effect]) -> SearchToken {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RunSearch { token, .. } => Some(*token),
            _ => None,
        })
        .expect("run search effect")
}

fn hits(title: &str) -> Vec<NormalizedResult> {
    vec![NormalizedResult::new(title, ResultType::Website)]
}

fn complete(state: SearchSession, token: SearchToken, title: &str) -> SearchSession {
    update(
        state,
        Msg::SearchCompleted {
            token,
            results: hits(title),
        },
    )
    .0
}

#[test]
fn explicit_submit_cancels_debounce_and_runs_immediately() {
    init_logging();
    let (state, effects) = update(SearchSession::default(), Msg::InputChanged("Cats ".into()));
    assert_eq!(
        effects,
        vec![Effect::ArmDebounce {
            generation: 1,
            delay: Duration::from_millis(350),
        }]
    );
    assert!(state.view().loading);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert_eq!(
        effects,
        vec![
            Effect::CancelDebounce,
            Effect::PushLocation {
                location: "/results.html?q=cats".into(),
            },
            Effect::RunSearch {
                token: 1,
                query: "cats".into(),
            },
        ]
    );
    assert!(!state.has_pending_debounce());

    // The timer that was armed before the submit must not search again.
    let (_, effects) = update(state, Msg::DebounceElapsed { generation: 1 });
    assert!(effects.is_empty());
}

#[test]
fn only_latest_debounce_generation_fires() {
    init_logging();
    let (state, _) = update(SearchSession::default(), Msg::InputChanged("ca".into()));
    let (state, _) = update(state, Msg::InputChanged("cat".into()));

    let (state, effects) = update(state, Msg::DebounceElapsed { generation: 1 });
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::DebounceElapsed { generation: 2 });
    assert_eq!(token_of(&effects), 1);
    assert!(effects.contains(&Effect::RunSearch {
        token: 1,
        query: "cat".into()
    }));

    let (_, effects) = update(state, Msg::DebounceElapsed { generation: 2 });
    assert!(effects.is_empty());
}

#[test]
fn blank_input_shows_prompt_without_searching() {
    init_logging();
    let (state, _) = update(SearchSession::default(), Msg::InputChanged("rust".into()));
    let (state, effects) = update(state, Msg::InputChanged("   ".into()));
    assert_eq!(effects, vec![Effect::CancelDebounce]);
    let view = state.view();
    assert_eq!(view.results, ResultsView::Prompt);
    assert!(!view.loading);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert!(effects.is_empty());
    assert_eq!(state.current_token(), 0);
}

#[test]
fn newest_search_wins_regardless_of_completion_order() {
    init_logging();
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let mut state = SearchSession::default();
        let mut tokens = Vec::new();
        for query in ["alpha", "beta", "gamma"] {
            let (next, effects) = submit(state, query);
            tokens.push(token_of(&effects));
            state = next;
        }
        for index in order {
            state = complete(state, tokens[index], ["alpha", "beta", "gamma"][index]);
        }
        let titles: Vec<_> = state.last_results().iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["gamma".to_string()], "order {order:?}");
    }
}

#[test]
fn stale_completion_resets_loader_but_keeps_display() {
    init_logging();
    let (state, first) = submit(SearchSession::default(), "a");
    let (state, _) = submit(state, "b");

    let state = complete(state, token_of(&first), "a");
    let view = state.view();
    assert!(!view.loading);
    assert_eq!(view.results, ResultsView::Blank);
    assert!(state.last_results().is_empty());
}

#[test]
fn errors_surface_only_for_the_current_token() {
    init_logging();
    let (state, first) = submit(SearchSession::default(), "a");
    let (state, second) = submit(state, "b");

    let (state, _) = update(
        state,
        Msg::SearchFailed {
            token: token_of(&first),
            message: "boom".into(),
        },
    );
    assert_eq!(state.view().results, ResultsView::Blank);
    assert!(state.view().loading);

    let (state, _) = update(
        state,
        Msg::SearchFailed {
            token: token_of(&second),
            message: "connection refused".into(),
        },
    );
    let view = state.view();
    assert_eq!(view.results, ResultsView::Error(SEARCH_ERROR_MESSAGE.into()));
    assert!(!view.loading);
}

#[test]
fn location_seeds_query_and_debug_panel() {
    init_logging();
    let (state, effects) = update(
        SearchSession::default(),
        Msg::LocationLoaded("?q=Rust%20Lang&debug=1".into()),
    );
    assert!(effects.contains(&Effect::RunSearch {
        token: 1,
        query: "rust lang".into()
    }));

    let view = state.view();
    assert_eq!(view.input, "Rust Lang");
    assert_eq!(view.location.as_deref(), Some("/results.html?q=rust+lang"));
    let debug = view.debug.expect("debug panel enabled");
    assert_eq!(debug.token, 1);
    assert_eq!(debug.last_query, "rust lang");
    assert!(debug.is_searching);
}

#[test]
fn dirty_flag_tracks_changes() {
    init_logging();
    let (mut state, _) = submit(SearchSession::default(), "rust");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());

    let (mut state, _) = update(state, Msg::NoOp);
    assert!(!state.consume_dirty());
}
