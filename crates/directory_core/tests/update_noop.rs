use directory_core::{update, Msg, SearchSession};

#[test]
fn update_is_noop() {
    let state = SearchSession::default();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_leaves_state_untouched() {
    let state = SearchSession::default();
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
