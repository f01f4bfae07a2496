use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

use super::snapshot::{RawCodeLayout, RawElement, RawSnapshot};
use crate::mapping::mapping_types::HatSample;
use crate::mapping::{ButtonSource, ControllerModel, LogicalButton, Profile, RawIndex};

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),

    #[error("No gamepad connected")]
    NoGamepad,
}

/// Name and vendor of the pad the collector is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct PadIdentity {
    pub name: String,
    pub vendor_id: Option<u16>,
}

impl PadIdentity {
    pub fn model(&self) -> ControllerModel {
        ControllerModel::identify(self.vendor_id, &self.name)
    }
}

/// A gilrs event with its code unpacked, as folded into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    Button { button: Button, code: u32, down: bool },
    ButtonValue { button: Button, code: u32, value: f32 },
    Axis { axis: Axis, code: u32, value: f32 },
    Connected,
    Disconnected,
}

impl RawEvent {
    pub fn from_gilrs(event: EventType) -> Option<Self> {
        match event {
            EventType::ButtonPressed(button, code) => Some(RawEvent::Button {
                button,
                code: code.into_u32(),
                down: true,
            }),
            EventType::ButtonReleased(button, code) => Some(RawEvent::Button {
                button,
                code: code.into_u32(),
                down: false,
            }),
            EventType::ButtonChanged(button, value, code) => Some(RawEvent::ButtonValue {
                button,
                code: code.into_u32(),
                value,
            }),
            EventType::AxisChanged(axis, value, code) => Some(RawEvent::Axis {
                axis,
                code: code.into_u32(),
                value,
            }),
            EventType::Connected => Some(RawEvent::Connected),
            EventType::Disconnected => Some(RawEvent::Disconnected),
            _ => None,
        }
    }
}

/// Where D-pad input lands in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpadRoute {
    /// A hat switch the profile synthesizes D-pad buttons from.
    Hat(RawIndex),
    /// Real raw buttons, in up/down/left/right order.
    Buttons([Option<RawIndex>; 4]),
}

impl Default for DpadRoute {
    fn default() -> Self {
        DpadRoute::Hat(0)
    }
}

impl DpadRoute {
    pub fn for_profile(profile: &Profile) -> Self {
        if let Some(hat) = profile.hat_index() {
            return DpadRoute::Hat(hat);
        }
        let raw = |button| match profile.resolve(button) {
            ButtonSource::Raw(raw) => Some(raw),
            _ => None,
        };
        DpadRoute::Buttons([
            raw(LogicalButton::DpadUp),
            raw(LogicalButton::DpadDown),
            raw(LogicalButton::DpadLeft),
            raw(LogicalButton::DpadRight),
        ])
    }
}

// D-pad directions currently held, in up/down/left/right order
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DpadFlags {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl DpadFlags {
    fn set(&mut self, button: Button, down: bool) -> bool {
        match button {
            Button::DPadUp => self.up = down,
            Button::DPadDown => self.down = down,
            Button::DPadLeft => self.left = down,
            Button::DPadRight => self.right = down,
            _ => return false,
        }
        true
    }

    fn sample(&self) -> HatSample {
        HatSample::from_flags(self.up, self.down, self.left, self.right)
    }
}

/// Folds host events into a [`RawSnapshot`].
#[derive(Debug)]
pub struct EventFolder {
    layout: RawCodeLayout,
    dpad_route: DpadRoute,
    dpad: DpadFlags,
    snapshot: RawSnapshot,
    // Set when the active gamepad went away since the last take
    detached: bool,
}

impl EventFolder {
    pub fn new(layout: RawCodeLayout) -> Self {
        Self {
            layout,
            dpad_route: DpadRoute::default(),
            dpad: DpadFlags::default(),
            snapshot: RawSnapshot::new(),
            detached: false,
        }
    }

    pub fn layout(&self) -> &RawCodeLayout {
        &self.layout
    }

    pub fn dpad_route(&self) -> DpadRoute {
        self.dpad_route
    }

    pub fn set_dpad_route(&mut self, route: DpadRoute) {
        debug!("Routing D-pad to {:?}", route);
        self.dpad_route = route;
        self.write_dpad();
    }

    pub fn snapshot(&self) -> &RawSnapshot {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut RawSnapshot {
        &mut self.snapshot
    }

    /// True once after a disconnect was folded.
    pub fn take_detached(&mut self) -> bool {
        std::mem::take(&mut self.detached)
    }

    pub fn apply(&mut self, event: RawEvent) {
        match event {
            RawEvent::Button { button, code, down } => {
                if self.dpad.set(button, down) {
                    self.write_dpad();
                    return;
                }
                match self.layout.classify(code) {
                    Some(RawElement::Button(raw)) => self.snapshot.set_button(raw, down),
                    // Analog triggers arrive as button values
                    Some(RawElement::Axis(_)) => {}
                    None => debug!("Unclassified button code {:#x} for {:?}", code, button),
                }
            }
            RawEvent::ButtonValue { button, code, value } => {
                if let Some(RawElement::Axis(raw)) = self.layout.classify(code) {
                    debug!("Analog button {:?} on raw axis {} = {:.4}", button, raw, value);
                    self.snapshot.set_axis(raw, value);
                }
            }
            RawEvent::Axis {
                axis: Axis::DPadX,
                value,
                ..
            } => {
                self.dpad.left = value < -0.5;
                self.dpad.right = value > 0.5;
                self.write_dpad();
            }
            RawEvent::Axis {
                axis: Axis::DPadY,
                value,
                ..
            } => {
                // gilrs reports up as positive
                self.dpad.up = value > 0.5;
                self.dpad.down = value < -0.5;
                self.write_dpad();
            }
            RawEvent::Axis { axis, code, value } => match self.layout.classify(code) {
                Some(RawElement::Axis(raw)) => self.snapshot.set_axis(raw, value),
                _ => debug!("Unclassified axis code {:#x} for {:?}", code, axis),
            },
            RawEvent::Disconnected => {
                warn!("Active gamepad disconnected, clearing raw state");
                self.snapshot.clear();
                self.dpad = DpadFlags::default();
                self.detached = true;
            }
            RawEvent::Connected => {
                info!("Active gamepad reconnected");
            }
        }
    }

    fn write_dpad(&mut self) {
        match self.dpad_route {
            DpadRoute::Hat(hat) => self.snapshot.set_hat(hat, self.dpad.sample()),
            DpadRoute::Buttons(raws) => {
                let held = [self.dpad.up, self.dpad.down, self.dpad.left, self.dpad.right];
                for (raw, down) in raws.into_iter().zip(held) {
                    if let Some(raw) = raw {
                        self.snapshot.set_button(raw, down);
                    }
                }
            }
        }
    }
}

// Define collector states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

#[machine]
#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    // Gilrs context
    gilrs: Gilrs,

    // Active gamepad
    active_gamepad: Option<GamepadId>,

    // Raw state of the active gamepad, updated per event
    folder: EventFolder,
}

impl<S: CollectionState> EventCollector<S> {
    pub fn layout(&self) -> &RawCodeLayout {
        self.folder.layout()
    }
}

// Implementation for Initializing state
impl EventCollector<Initializing> {
    pub fn create(layout: RawCodeLayout) -> Result<Self, CollectorError> {
        debug!("Creating Event Collector with layout: {:?}", layout);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, EventFolder::new(layout)))
    }

    // Bind to the first connected gamepad and transition to Collecting state
    pub fn initialize(
        mut self,
    ) -> Result<(EventCollector<Collecting>, PadIdentity), CollectorError> {
        let mut identity = None;
        for (id, gamepad) in self.gilrs.gamepads() {
            info!(
                "Found gamepad ID: {}, Name: {}, Vendor: {:?}",
                id,
                gamepad.name(),
                gamepad.vendor_id()
            );
            if identity.is_none() {
                identity = Some((
                    id,
                    PadIdentity {
                        name: gamepad.name().to_string(),
                        vendor_id: gamepad.vendor_id(),
                    },
                ));
            }
        }

        let Some((id, identity)) = identity else {
            warn!("No gamepad connected");
            return Err(CollectorError::NoGamepad);
        };

        self.active_gamepad = Some(id);
        info!("Selected gamepad: {} ({})", identity.name, id);
        Ok((self.transition(), identity))
    }
}

// Implementation for Collecting state
impl EventCollector<Collecting> {
    /// Sends D-pad input where `profile` expects it.
    pub fn bind_profile(&mut self, profile: &Profile) {
        self.folder.set_dpad_route(DpadRoute::for_profile(profile));
    }

    /// Drains all pending gilrs events into the raw snapshot and returns it.
    pub fn poll(&mut self) -> &mut RawSnapshot {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            if self.active_gamepad != Some(id) {
                debug!("Skipping event from non-active gamepad: {:?}", id);
                continue;
            }
            match RawEvent::from_gilrs(event) {
                Some(raw) => self.folder.apply(raw),
                None => debug!("Unhandled event type: {:?}", event),
            }
        }
        self.folder.snapshot_mut()
    }

    /// True once after the active gamepad disconnected.
    pub fn take_detached(&mut self) -> bool {
        self.folder.take_detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::gamepad::{Gamepad, GamepadSettings};
    use crate::controller::InputState;
    use crate::mapping::{LogicalAxis, PlatformVariant};

    const DI_AXIS: u32 = 1 << 16;

    fn button(button: Button, code: u32, down: bool) -> RawEvent {
        RawEvent::Button { button, code, down }
    }

    fn folder(variant: PlatformVariant) -> EventFolder {
        EventFolder::new(RawCodeLayout::for_variant(variant))
    }

    fn attach(model: ControllerModel, variant: PlatformVariant) -> Gamepad {
        Gamepad::attach(model, variant, &GamepadSettings::default()).unwrap()
    }

    #[test]
    fn test_dpad_flags_build_hat() {
        let mut dpad = DpadFlags::default();
        assert!(dpad.set(Button::DPadUp, true));
        assert!(dpad.set(Button::DPadLeft, true));
        assert_eq!(dpad.sample(), HatSample::UpLeft);

        assert!(dpad.set(Button::DPadUp, false));
        assert_eq!(dpad.sample(), HatSample::Left);

        assert!(!dpad.set(Button::South, true));
    }

    #[test]
    fn test_identity_model() {
        let identity = PadIdentity {
            name: "Xbox 360 Controller".to_string(),
            vendor_id: Some(0x045E),
        };
        assert_eq!(identity.model(), ControllerModel::Xbox360);
    }

    #[test]
    fn test_buttons_and_axes_are_classified() {
        let mut folder = folder(PlatformVariant::Evdev);
        // EV_KEY BTN_SOUTH, EV_ABS ABS_RX
        folder.apply(button(Button::South, 0x0001_0130, true));
        folder.apply(RawEvent::Axis {
            axis: Axis::RightStickX,
            code: 0x0003_0003,
            value: -0.75,
        });
        // Unknown code is dropped
        folder.apply(button(Button::C, 0x0001_0020, true));

        let snapshot = folder.snapshot();
        assert_eq!(snapshot.pressed_buttons().collect::<Vec<_>>(), vec![6]);
        assert_eq!(snapshot.axis(3), Some(-0.75));
    }

    #[test]
    fn test_trigger_value_lands_on_axis() {
        let mut folder = folder(PlatformVariant::DirectInput);
        folder.apply(button(Button::LeftTrigger2, DI_AXIS | 3, true));
        folder.apply(RawEvent::ButtonValue {
            button: Button::LeftTrigger2,
            code: DI_AXIS | 3,
            value: 0.6,
        });

        assert_eq!(folder.snapshot().axis(3), Some(0.6));
        assert_eq!(folder.snapshot().pressed_buttons().count(), 0);
    }

    #[test]
    fn test_released_trigger_reads_released() {
        let mut folder = folder(PlatformVariant::DirectInput);
        let mut pad = attach(ControllerModel::DualShock4, PlatformVariant::DirectInput);

        let mut states = Vec::new();
        for value in [0.0, 0.8, 0.0] {
            folder.apply(RawEvent::ButtonValue {
                button: Button::RightTrigger2,
                code: DI_AXIS | 4,
                value,
            });
            pad.advance(folder.snapshot_mut());
            states.push(pad.analog_state(LogicalAxis::RightTrigger));
        }
        assert_eq!(
            states,
            vec![
                InputState::Released,
                InputState::JustPressed,
                InputState::JustReleased
            ]
        );
    }

    #[test]
    fn test_dpad_axes_fold_into_hat() {
        let mut folder = folder(PlatformVariant::Evdev);
        folder.apply(RawEvent::Axis {
            axis: Axis::DPadY,
            code: 0x0003_0011,
            value: 1.0,
        });
        folder.apply(RawEvent::Axis {
            axis: Axis::DPadX,
            code: 0x0003_0010,
            value: 1.0,
        });
        assert_eq!(folder.snapshot().hat(0), HatSample::UpRight);
        assert_eq!(folder.snapshot().axis(0x10), None);
    }

    #[test]
    fn test_dpad_reaches_real_buttons_without_hat() {
        let mut pad = attach(ControllerModel::DualShock4, PlatformVariant::IoKit);
        let mut folder = folder(PlatformVariant::IoKit);
        folder.set_dpad_route(DpadRoute::for_profile(pad.profile()));
        assert_eq!(
            folder.dpad_route(),
            DpadRoute::Buttons([Some(24), Some(25), Some(26), Some(27)])
        );

        folder.apply(button(Button::DPadUp, 0, true));
        pad.advance(folder.snapshot_mut());
        assert_eq!(pad.state(LogicalButton::DpadUp), InputState::JustPressed);

        folder.apply(RawEvent::Axis {
            axis: Axis::DPadX,
            code: 0,
            value: -1.0,
        });
        pad.advance(folder.snapshot_mut());
        assert_eq!(pad.state(LogicalButton::DpadUp), InputState::Pressed);
        assert_eq!(pad.state(LogicalButton::DpadLeft), InputState::JustPressed);
    }

    #[test]
    fn test_tap_between_polls_is_reported() {
        let mut folder = folder(PlatformVariant::DirectInput);
        let mut pad = attach(ControllerModel::DualShock4, PlatformVariant::DirectInput);

        folder.apply(button(Button::West, 0, true));
        folder.apply(button(Button::West, 0, false));
        pad.advance(folder.snapshot_mut());
        assert_eq!(pad.state(LogicalButton::Square), InputState::JustPressed);
        pad.advance(folder.snapshot_mut());
        assert_eq!(pad.state(LogicalButton::Square), InputState::JustReleased);
    }

    #[test]
    fn test_disconnect_clears_state() {
        let mut folder = folder(PlatformVariant::DirectInput);
        folder.apply(button(Button::South, 1, true));
        folder.apply(button(Button::DPadDown, 0, true));
        folder.apply(RawEvent::Disconnected);

        assert!(!folder.snapshot().button(1));
        assert_eq!(folder.snapshot().hat(0), HatSample::Centered);
        assert!(folder.take_detached());
        assert!(!folder.take_detached());

        folder.apply(RawEvent::Connected);
        assert!(!folder.take_detached());
    }
}
