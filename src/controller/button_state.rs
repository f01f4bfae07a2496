//! Per-button press/release state machine.

/// Discrete state of a digital control for the current tick.
///
/// `JustPressed` and `JustReleased` last exactly one tick per edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputState {
    #[default]
    Released,
    JustPressed,
    Pressed,
    JustReleased,
}

impl InputState {
    /// State after one tick in which the control was sampled as `down`.
    pub fn next(self, down: bool) -> Self {
        match (self, down) {
            (InputState::Released, false) => InputState::Released,
            (InputState::Released, true) => InputState::JustPressed,
            (InputState::JustPressed, true) => InputState::Pressed,
            (InputState::JustPressed, false) => InputState::JustReleased,
            (InputState::Pressed, true) => InputState::Pressed,
            (InputState::Pressed, false) => InputState::JustReleased,
            (InputState::JustReleased, false) => InputState::Released,
            (InputState::JustReleased, true) => InputState::JustPressed,
        }
    }

    /// Held this tick, including the tick it went down.
    pub fn is_down(self) -> bool {
        matches!(self, InputState::JustPressed | InputState::Pressed)
    }

    pub fn just_pressed(self) -> bool {
        self == InputState::JustPressed
    }

    pub fn just_released(self) -> bool {
        self == InputState::JustReleased
    }

    /// True on the tick of either edge.
    pub fn is_edge(self) -> bool {
        self.just_pressed() || self.just_released()
    }
}

/// Holds one control's [`InputState`] across ticks.
#[derive(Debug, Clone, Default)]
pub struct ButtonStateMachine {
    state: InputState,
}

impl ButtonStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// Advances exactly one tick and returns the new state.
    pub fn advance(&mut self, down: bool) -> InputState {
        self.state = self.state.next(down);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = InputState::Released;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InputState::*;

    fn run(samples: &[bool]) -> Vec<InputState> {
        let mut machine = ButtonStateMachine::new();
        samples.iter().map(|down| machine.advance(*down)).collect()
    }

    #[test]
    fn test_starts_released() {
        assert_eq!(ButtonStateMachine::new().state(), Released);
    }

    #[test]
    fn test_full_cycle() {
        assert_eq!(
            run(&[true, true, true, false, false]),
            vec![JustPressed, Pressed, Pressed, JustReleased, Released]
        );
    }

    #[test]
    fn test_one_tick_tap_shows_both_edges() {
        assert_eq!(
            run(&[true, false, false, false]),
            vec![JustPressed, JustReleased, Released, Released]
        );
    }

    #[test]
    fn test_repress_right_after_release() {
        assert_eq!(
            run(&[true, false, true, true]),
            vec![JustPressed, JustReleased, JustPressed, Pressed]
        );
    }

    #[test]
    fn test_every_state_has_both_successors() {
        for state in [Released, JustPressed, Pressed, JustReleased] {
            assert!(state.next(true).is_down());
            assert!(!state.next(false).is_down());
        }
    }

    #[test]
    fn test_reset() {
        let mut machine = ButtonStateMachine::new();
        machine.advance(true);
        machine.reset();
        assert_eq!(machine.state(), Released);
    }
}
