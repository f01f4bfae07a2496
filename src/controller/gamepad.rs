//! Gamepad aggregate: one profile plus every per-control state machine.
//!
//! [`Gamepad::advance`] is the only mutating call and runs once per tick.
//! Every query reads the state it produced, so all views agree until the
//! next advance.

use std::collections::HashMap;
use tracing::{debug, info};

use super::analog::{AnalogAdapter, Deflection};
use super::button_state::{ButtonStateMachine, InputState};
use super::snapshot::RawSnapshot;
use crate::mapping::{
    AnalogStick, ControllerModel, LogicalAxis, LogicalButton, PlatformVariant, Profile,
    ProfileError, ResolvedFrame,
};

/// Any control that can be queried through [`Gamepad::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Button(LogicalButton),
    Axis(LogicalAxis),
    Stick(AnalogStick),
}

impl From<LogicalButton> for Control {
    fn from(button: LogicalButton) -> Self {
        Control::Button(button)
    }
}

impl From<LogicalAxis> for Control {
    fn from(axis: LogicalAxis) -> Self {
        Control::Axis(axis)
    }
}

impl From<AnalogStick> for Control {
    fn from(stick: AnalogStick) -> Self {
        Control::Stick(stick)
    }
}

/// Analog controls with derived digital state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogControl {
    Axis(LogicalAxis),
    Stick(AnalogStick),
}

impl From<LogicalAxis> for AnalogControl {
    fn from(axis: LogicalAxis) -> Self {
        AnalogControl::Axis(axis)
    }
}

impl From<AnalogStick> for AnalogControl {
    fn from(stick: AnalogStick) -> Self {
        AnalogControl::Stick(stick)
    }
}

/// Result of [`Gamepad::value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputValue {
    Digital(InputState),
    /// Normalized axis value, or the deflection magnitude of a stick.
    Analog(f32),
}

/// Thresholds used to derive digital state from analog controls.
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadSettings {
    /// Deflection at which a stick axis or a whole stick counts as moved.
    pub stick_threshold: f32,
    /// Travel at which a trigger counts as pulled.
    pub trigger_threshold: f32,
    /// How far below the threshold a held control must fall to release.
    pub hysteresis: f32,
    /// Per-axis overrides of the two thresholds above.
    pub axis_thresholds: HashMap<LogicalAxis, f32>,
}

impl Default for GamepadSettings {
    fn default() -> Self {
        Self {
            stick_threshold: 0.5,
            trigger_threshold: 0.5,
            hysteresis: 0.0,
            axis_thresholds: HashMap::new(),
        }
    }
}

impl GamepadSettings {
    pub fn threshold_for(&self, axis: LogicalAxis) -> f32 {
        match self.axis_thresholds.get(&axis) {
            Some(threshold) => *threshold,
            None if axis.is_trigger() => self.trigger_threshold,
            None => self.stick_threshold,
        }
    }
}

#[derive(Debug, Clone)]
struct StickState {
    position: (f32, f32),
    adapter: AnalogAdapter,
}

/// Logical view of one attached controller.
#[derive(Debug, Clone)]
pub struct Gamepad {
    profile: Profile,
    buttons: HashMap<LogicalButton, ButtonStateMachine>,
    axes: HashMap<LogicalAxis, AnalogAdapter>,
    sticks: HashMap<AnalogStick, StickState>,
    tick: u64,
}

impl Gamepad {
    pub fn new(profile: Profile, settings: &GamepadSettings) -> Self {
        let buttons = LogicalButton::ALL
            .into_iter()
            .map(|button| (button, ButtonStateMachine::new()))
            .collect();

        let axes = LogicalAxis::ALL
            .into_iter()
            .map(|axis| {
                let deflection = if axis.is_trigger() {
                    Deflection::OneSided
                } else {
                    Deflection::TwoSided
                };
                let adapter = AnalogAdapter::new(deflection, settings.threshold_for(axis))
                    .with_hysteresis(settings.hysteresis);
                (axis, adapter)
            })
            .collect();

        let sticks = AnalogStick::ALL
            .into_iter()
            .map(|stick| {
                let adapter = AnalogAdapter::new(Deflection::OneSided, settings.stick_threshold)
                    .with_hysteresis(settings.hysteresis);
                (
                    stick,
                    StickState {
                        position: (0.0, 0.0),
                        adapter,
                    },
                )
            })
            .collect();

        info!(
            "Attached {} gamepad on {} (stick threshold {}, trigger threshold {})",
            profile.model(),
            profile.variant(),
            settings.stick_threshold,
            settings.trigger_threshold
        );

        Self {
            profile,
            buttons,
            axes,
            sticks,
            tick: 0,
        }
    }

    /// Builds the profile for `model` on `variant` and attaches a gamepad.
    pub fn attach(
        model: ControllerModel,
        variant: PlatformVariant,
        settings: &GamepadSettings,
    ) -> Result<Self, ProfileError> {
        Ok(Self::new(Profile::new(model, variant)?, settings))
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Number of completed advances.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances every owned state machine exactly once from this tick's raw
    /// snapshot. Controls without input this tick are sampled as released.
    ///
    /// Taps recorded in the snapshot are consumed, so a press released
    /// before this tick shows up as released on the next one.
    pub fn advance(&mut self, snapshot: &mut RawSnapshot) {
        let frame = ResolvedFrame::resolve(snapshot, &self.profile);
        snapshot.finish_tick();
        self.tick += 1;

        for (button, machine) in self.buttons.iter_mut() {
            let state = machine.advance(frame.is_down(*button));
            if state.is_edge() {
                debug!("Tick {}: {:?} {:?}", self.tick, button, state);
            }
        }

        for (axis, adapter) in self.axes.iter_mut() {
            let state = adapter.advance(frame.axis(*axis));
            if state.is_edge() {
                debug!(
                    "Tick {}: {:?} {:?} at {:.3}",
                    self.tick,
                    axis,
                    state,
                    adapter.sample()
                );
            }
        }

        for (stick, stick_state) in self.sticks.iter_mut() {
            let (x_axis, y_axis) = stick.axes();
            let x = frame.axis(x_axis);
            let y = frame.axis(y_axis);
            stick_state.position = (x, y);
            let state = stick_state.adapter.advance(x.hypot(y).min(1.0));
            if state.is_edge() {
                debug!(
                    "Tick {}: {:?} stick {:?} at ({:.3}, {:.3})",
                    self.tick, stick, state, x, y
                );
            }
        }
    }

    /// Current state or sample of any control.
    ///
    /// Controls the profile lacks read as `Released` or `0.0`.
    pub fn value(&self, control: impl Into<Control>) -> InputValue {
        match control.into() {
            Control::Button(button) => InputValue::Digital(self.state(button)),
            Control::Axis(axis) => InputValue::Analog(self.axis(axis)),
            Control::Stick(stick) => {
                let (x, y) = self.stick(stick);
                InputValue::Analog(x.hypot(y).min(1.0))
            }
        }
    }

    pub fn state(&self, button: LogicalButton) -> InputState {
        self.buttons
            .get(&button)
            .map(ButtonStateMachine::state)
            .unwrap_or_default()
    }

    /// Normalized axis value for this tick.
    pub fn axis(&self, axis: LogicalAxis) -> f32 {
        self.axes.get(&axis).map(AnalogAdapter::sample).unwrap_or(0.0)
    }

    /// (x, y) position of a stick for this tick.
    pub fn stick(&self, stick: AnalogStick) -> (f32, f32) {
        self.sticks
            .get(&stick)
            .map(|s| s.position)
            .unwrap_or((0.0, 0.0))
    }

    pub fn is_pressed(&self, button: LogicalButton) -> bool {
        self.state(button).is_down()
    }

    pub fn just_pressed(&self, button: LogicalButton) -> bool {
        self.state(button).just_pressed()
    }

    pub fn just_released_button(&self, button: LogicalButton) -> bool {
        self.state(button).just_released()
    }

    /// Derived digital state of an analog control.
    pub fn analog_state(&self, control: impl Into<AnalogControl>) -> InputState {
        let adapter = match control.into() {
            AnalogControl::Axis(axis) => self.axes.get(&axis),
            AnalogControl::Stick(stick) => self.sticks.get(&stick).map(|s| &s.adapter),
        };
        adapter.map(AnalogAdapter::state).unwrap_or_default()
    }

    /// True on the tick an analog control crossed its threshold.
    pub fn just_moved(&self, control: impl Into<AnalogControl>) -> bool {
        self.analog_state(control).just_pressed()
    }

    /// True on the tick an analog control fell back below its threshold.
    pub fn just_released(&self, control: impl Into<AnalogControl>) -> bool {
        self.analog_state(control).just_released()
    }

    /// Buttons held this tick, in logical order.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = LogicalButton> + '_ {
        LogicalButton::ALL
            .into_iter()
            .filter(move |button| self.is_pressed(*button))
    }

    /// Returns every control to neutral, as on detach.
    pub fn reset(&mut self) {
        info!(
            "Resetting {} gamepad after {} ticks",
            self.profile.model(),
            self.tick
        );
        self.buttons.values_mut().for_each(ButtonStateMachine::reset);
        self.axes.values_mut().for_each(AnalogAdapter::reset);
        for stick in self.sticks.values_mut() {
            stick.position = (0.0, 0.0);
            stick.adapter.reset();
        }
        self.tick = 0;
    }
}
