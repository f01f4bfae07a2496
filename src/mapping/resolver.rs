//! Raw-to-logical translation.
//!
//! Everything here is a pure function of the raw sample and the active
//! profile.

use std::collections::HashMap;
use tracing::{debug, trace};

use super::mapping_types::{HatSample, LogicalAxis, LogicalButton, LogicalId, RawIndex};
use super::profile::{AxisBinding, ButtonSource, NativeRange, Profile};
use crate::controller::snapshot::RawSnapshot;

/// Identity of a raw axis index.
///
/// Stick and trigger axes become [`LogicalId::Axis`], which is a different
/// variant from every button ID even when the API numbers axes and buttons
/// from the same base. Indices the profile does not know pass through as
/// [`LogicalId::RawAxis`].
pub fn translate_axis(raw: RawIndex, profile: &Profile) -> LogicalId {
    match profile.axis_at(raw) {
        Some(axis) => LogicalId::Axis(axis),
        None => LogicalId::RawAxis(raw),
    }
}

/// Identity of a raw button index.
pub fn translate_button(raw: RawIndex, profile: &Profile) -> LogicalId {
    match profile.button_at(raw) {
        Some(button) => LogicalId::Button(button),
        None => LogicalId::RawButton(raw),
    }
}

/// Synthesized D-pad IDs held by a hat sample. These are never raw indices.
pub fn translate_hat(sample: HatSample) -> impl Iterator<Item = LogicalId> {
    sample.directions().iter().copied().map(LogicalId::Hat)
}

/// Maps a raw axis value from its native range into the logical range:
/// [-1, 1] for sticks, [0, 1] for triggers. Out-of-range and non-finite
/// values are clamped.
pub fn normalize_axis(binding: AxisBinding, axis: LogicalAxis, value: f32) -> f32 {
    if !value.is_finite() {
        debug!("Discarding non-finite sample {} on {:?}", value, axis);
        return 0.0;
    }

    let normalized = match binding.range {
        NativeRange::Bipolar => value.clamp(-1.0, 1.0),
        NativeRange::Unipolar => value.clamp(0.0, 1.0),
    };

    if axis.is_trigger() {
        normalized.clamp(0.0, 1.0)
    } else {
        normalized
    }
}

/// One tick of raw input translated into logical terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFrame {
    buttons: HashMap<LogicalButton, bool>,
    axes: HashMap<LogicalAxis, f32>,
}

impl ResolvedFrame {
    pub fn resolve(snapshot: &RawSnapshot, profile: &Profile) -> Self {
        let mut frame = Self::default();

        for raw in snapshot.pressed_buttons() {
            match translate_button(raw, profile) {
                LogicalId::Button(button) => {
                    frame.buttons.insert(button, true);
                }
                other => trace!("Ignoring unmapped button {:?}", other),
            }
        }

        if let Some(hat) = profile.hat_index() {
            for id in translate_hat(snapshot.hat(hat)) {
                if let LogicalId::Hat(direction) = id {
                    let button = direction.button();
                    if profile.resolve(button) == ButtonSource::Hat(direction) {
                        frame.buttons.insert(button, true);
                    }
                }
            }
        }

        for (raw, value) in snapshot.reported_axes() {
            match translate_axis(raw, profile) {
                LogicalId::Axis(axis) => {
                    if let Some(binding) = profile.axis(axis) {
                        frame.axes.insert(axis, normalize_axis(binding, axis, value));
                    }
                }
                other => trace!("Ignoring unmapped axis {:?}", other),
            }
        }

        frame
    }

    /// Whether `button` is down this tick. Unsupported buttons are never down.
    pub fn is_down(&self, button: LogicalButton) -> bool {
        self.buttons.get(&button).copied().unwrap_or(false)
    }

    /// Normalized value of `axis`; 0.0 if the axis did not report.
    pub fn axis(&self, axis: LogicalAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::mapping_types::{ControllerModel, HatDirection, PlatformVariant};

    fn profile(model: ControllerModel, variant: PlatformVariant) -> Profile {
        Profile::new(model, variant).unwrap()
    }

    #[test]
    fn test_shared_space_trigger_gets_axis_id() {
        for model in ControllerModel::ALL {
            let profile = profile(model, PlatformVariant::IoKit);
            let raw = profile.axis(LogicalAxis::LeftTrigger).unwrap().raw;

            // The same number is also a real button on this variant.
            assert!(profile.button_at(raw).is_some());

            let id = translate_axis(raw, &profile);
            assert_eq!(id, LogicalId::Axis(LogicalAxis::LeftTrigger));
            for button in LogicalButton::ALL {
                assert_ne!(id, LogicalId::Button(button));
            }
        }
    }

    #[test]
    fn test_every_stick_and_trigger_axis_is_remapped() {
        let profile = profile(ControllerModel::DualShock4, PlatformVariant::IoKit);
        let mut ids = Vec::new();
        for axis in LogicalAxis::ALL {
            let raw = profile.axis(axis).unwrap().raw;
            let id = translate_axis(raw, &profile);
            assert_eq!(id, LogicalId::Axis(axis));
            assert!(!ids.contains(&id));
            ids.push(id);
        }
    }

    #[test]
    fn test_unknown_axis_passes_through() {
        let profile = profile(ControllerModel::DualShock4, PlatformVariant::IoKit);
        assert_eq!(translate_axis(42, &profile), LogicalId::RawAxis(42));
        assert_eq!(translate_button(42, &profile), LogicalId::RawButton(42));
    }

    #[test]
    fn test_hat_emits_synthesized_ids() {
        let ids: Vec<_> = translate_hat(HatSample::UpLeft).collect();
        assert_eq!(
            ids,
            vec![
                LogicalId::Hat(HatDirection::Up),
                LogicalId::Hat(HatDirection::Left)
            ]
        );
        assert_eq!(translate_hat(HatSample::Centered).count(), 0);
    }

    #[test]
    fn test_normalize_clamps_and_rescales() {
        let stick = AxisBinding {
            raw: 0,
            range: NativeRange::Bipolar,
        };
        assert_eq!(normalize_axis(stick, LogicalAxis::LeftStickX, 1.7), 1.0);
        assert_eq!(normalize_axis(stick, LogicalAxis::LeftStickX, -3.0), -1.0);
        assert_eq!(normalize_axis(stick, LogicalAxis::LeftStickX, f32::NAN), 0.0);

        let trigger = AxisBinding {
            raw: 3,
            range: NativeRange::Unipolar,
        };
        assert_eq!(normalize_axis(trigger, LogicalAxis::LeftTrigger, 0.0), 0.0);
        assert_eq!(normalize_axis(trigger, LogicalAxis::LeftTrigger, 0.75), 0.75);
        assert_eq!(normalize_axis(trigger, LogicalAxis::RightTrigger, -0.2), 0.0);
        assert_eq!(normalize_axis(trigger, LogicalAxis::RightTrigger, 1.3), 1.0);
    }

    #[test]
    fn test_frame_keeps_shared_indices_apart() {
        let profile = profile(ControllerModel::DualShock4, PlatformVariant::IoKit);
        let mut snapshot = RawSnapshot::new();
        // Button 14 is L1, axis 14 is the right trigger.
        snapshot.set_button(14, true);
        snapshot.set_axis(14, 0.8);

        let frame = ResolvedFrame::resolve(&snapshot, &profile);
        assert!(frame.is_down(LogicalButton::L1));
        assert!(!frame.is_down(LogicalButton::R2));
        assert_eq!(frame.axis(LogicalAxis::RightTrigger), 0.8);
        assert_eq!(frame.axis(LogicalAxis::LeftTrigger), 0.0);
    }

    #[test]
    fn test_frame_synthesizes_dpad_from_hat() {
        let profile = profile(ControllerModel::Xbox360, PlatformVariant::Evdev);
        let mut snapshot = RawSnapshot::new();
        snapshot.set_hat(0, HatSample::from_axes(1, -1));

        let frame = ResolvedFrame::resolve(&snapshot, &profile);
        assert!(frame.is_down(LogicalButton::DpadUp));
        assert!(frame.is_down(LogicalButton::DpadRight));
        assert!(!frame.is_down(LogicalButton::DpadDown));
    }

    #[test]
    fn test_hat_ignored_where_dpad_is_real() {
        let profile = profile(ControllerModel::DualShock4, PlatformVariant::IoKit);
        let mut snapshot = RawSnapshot::new();
        snapshot.set_hat(0, HatSample::Up);

        let frame = ResolvedFrame::resolve(&snapshot, &profile);
        assert!(!frame.is_down(LogicalButton::DpadUp));
    }
}
