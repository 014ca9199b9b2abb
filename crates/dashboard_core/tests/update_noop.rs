use dashboard_core::{update, DashboardState, Msg};

#[test]
fn tick_is_noop() {
    let state = DashboardState::default();
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
