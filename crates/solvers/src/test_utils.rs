use sodyn_core::{Parameters, State, Strategy};

/// Builds a resting state with constants derived by `strategy`.
pub(crate) fn state_for(strategy: &dyn Strategy, params: Parameters, initial: f32) -> State {
    let mut state = State::new(params, initial);
    state.constants = strategy.constants(&params);
    state
}

/// Steps `state` toward a constant `target` `steps` times.
pub(crate) fn run(strategy: &dyn Strategy, state: &mut State, dt: f32, target: f32, steps: usize) {
    for _ in 0..steps {
        strategy.step(state, dt, target, None);
    }
}
