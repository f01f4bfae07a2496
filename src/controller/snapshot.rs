//! Raw per-tick input as delivered by the host input API.

use serde::{Deserialize, Serialize};

use crate::mapping::{PlatformVariant, RawIndex};
use crate::mapping::mapping_types::HatSample;

/// Level state of every raw control at the moment of polling.
///
/// Indices that were never written read as released / absent / centered.
/// A button pressed since the last [`finish_tick`](Self::finish_tick) reads
/// as down even if it was released again, so taps shorter than a tick are
/// not lost. The same holds for hat deflections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSnapshot {
    buttons: Vec<bool>,
    button_taps: Vec<bool>,
    axes: Vec<Option<f32>>,
    hats: Vec<HatSample>,
    hat_taps: Vec<HatSample>,
}

impl RawSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, raw: RawIndex, down: bool) {
        let index = usize::from(raw);
        if index >= self.buttons.len() {
            self.buttons.resize(index + 1, false);
        }
        self.buttons[index] = down;
        if down {
            if index >= self.button_taps.len() {
                self.button_taps.resize(index + 1, false);
            }
            self.button_taps[index] = true;
        }
    }

    pub fn set_axis(&mut self, raw: RawIndex, value: f32) {
        let index = usize::from(raw);
        if index >= self.axes.len() {
            self.axes.resize(index + 1, None);
        }
        self.axes[index] = Some(value);
    }

    pub fn set_hat(&mut self, raw: RawIndex, sample: HatSample) {
        let index = usize::from(raw);
        if index >= self.hats.len() {
            self.hats.resize(index + 1, HatSample::Centered);
        }
        self.hats[index] = sample;
        if sample != HatSample::Centered {
            if index >= self.hat_taps.len() {
                self.hat_taps.resize(index + 1, HatSample::Centered);
            }
            self.hat_taps[index] = sample;
        }
    }

    pub fn button(&self, raw: RawIndex) -> bool {
        let index = usize::from(raw);
        self.buttons.get(index).copied().unwrap_or(false)
            || self.button_taps.get(index).copied().unwrap_or(false)
    }

    pub fn axis(&self, raw: RawIndex) -> Option<f32> {
        self.axes.get(usize::from(raw)).copied().flatten()
    }

    pub fn hat(&self, raw: RawIndex) -> HatSample {
        let index = usize::from(raw);
        match self.hats.get(index).copied().unwrap_or_default() {
            HatSample::Centered => self.hat_taps.get(index).copied().unwrap_or_default(),
            held => held,
        }
    }

    /// Raw indices of all buttons down this tick, including taps already
    /// released again.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = RawIndex> + '_ {
        let len = self.buttons.len().max(self.button_taps.len());
        (0..len)
            .filter_map(|index| RawIndex::try_from(index).ok())
            .filter(move |raw| self.button(*raw))
    }

    /// Raw indices and values of all axes that reported a value.
    pub fn reported_axes(&self) -> impl Iterator<Item = (RawIndex, f32)> + '_ {
        self.axes.iter().enumerate().filter_map(|(index, value)| {
            let value = (*value)?;
            Some((RawIndex::try_from(index).ok()?, value))
        })
    }

    /// Forgets taps that were already reported. Levels are kept.
    pub fn finish_tick(&mut self) {
        self.button_taps.clear();
        self.hat_taps.clear();
    }

    /// Returns every control to neutral, as after a detach.
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.axes.clear();
        self.hats.clear();
        self.finish_tick();
    }
}

/// A platform event code classified into the raw index spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawElement {
    Button(RawIndex),
    Axis(RawIndex),
}

/// Translates packed platform event codes (`kind << 16 | code`) into raw
/// button and axis indices.
///
/// Codes of `button_kind` at or above `button_base` become buttons counted
/// from `button_offset`; codes of `axis_kind` at or above `axis_base` become
/// axes counted from `axis_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCodeLayout {
    pub button_kind: u16,
    pub button_base: u16,
    pub button_offset: u16,
    pub axis_kind: u16,
    pub axis_base: u16,
    pub axis_offset: u16,
}

impl RawCodeLayout {
    /// Default layout of the event codes each host API produces.
    pub fn for_variant(variant: PlatformVariant) -> Self {
        match variant {
            // Button and axis indices tagged 0 and 1.
            PlatformVariant::DirectInput => Self {
                button_kind: 0,
                button_base: 0,
                button_offset: 0,
                axis_kind: 1,
                axis_base: 0,
                axis_offset: 0,
            },
            // EV_KEY from BTN_SOUTH, EV_ABS from ABS_X.
            PlatformVariant::Evdev => Self {
                button_kind: 0x01,
                button_base: 0x130,
                button_offset: 6,
                axis_kind: 0x03,
                axis_base: 0x00,
                axis_offset: 0,
            },
            // HID button page from usage 1, generic desktop page from X.
            PlatformVariant::IoKit => Self {
                button_kind: 0x09,
                button_base: 0x01,
                button_offset: 10,
                axis_kind: 0x01,
                axis_base: 0x30,
                axis_offset: 10,
            },
        }
    }

    pub fn classify(&self, code: u32) -> Option<RawElement> {
        let kind = (code >> 16) as u16;
        let low = (code & 0xFFFF) as u16;

        if kind == self.button_kind && low >= self.button_base {
            let index = (low - self.button_base).checked_add(self.button_offset)?;
            return Some(RawElement::Button(index));
        }
        if kind == self.axis_kind && low >= self.axis_base {
            let index = (low - self.axis_base).checked_add(self.axis_offset)?;
            return Some(RawElement::Axis(index));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_indices_are_neutral() {
        let mut snapshot = RawSnapshot::new();
        snapshot.set_button(3, true);
        assert!(snapshot.button(3));
        assert!(!snapshot.button(2));
        assert!(!snapshot.button(400));
        assert_eq!(snapshot.axis(0), None);
        assert_eq!(snapshot.hat(1), HatSample::Centered);
    }

    #[test]
    fn test_pressed_buttons_and_reported_axes() {
        let mut snapshot = RawSnapshot::new();
        snapshot.set_button(1, true);
        snapshot.set_axis(2, -0.25);

        assert_eq!(snapshot.pressed_buttons().collect::<Vec<_>>(), vec![1]);
        assert_eq!(snapshot.reported_axes().collect::<Vec<_>>(), vec![(2, -0.25)]);

        snapshot.clear();
        assert_eq!(snapshot.pressed_buttons().count(), 0);
    }

    #[test]
    fn test_tap_within_one_tick_is_kept_until_finished() {
        let mut snapshot = RawSnapshot::new();
        snapshot.set_button(4, true);
        snapshot.set_button(4, false);
        snapshot.set_hat(0, HatSample::Up);
        snapshot.set_hat(0, HatSample::Centered);

        assert!(snapshot.button(4));
        assert_eq!(snapshot.pressed_buttons().collect::<Vec<_>>(), vec![4]);
        assert_eq!(snapshot.hat(0), HatSample::Up);

        snapshot.finish_tick();
        assert!(!snapshot.button(4));
        assert_eq!(snapshot.pressed_buttons().count(), 0);
        assert_eq!(snapshot.hat(0), HatSample::Centered);
    }

    #[test]
    fn test_held_button_survives_finish_tick() {
        let mut snapshot = RawSnapshot::new();
        snapshot.set_button(2, true);
        snapshot.finish_tick();
        assert!(snapshot.button(2));
    }

    #[test]
    fn test_evdev_codes() {
        let layout = RawCodeLayout::for_variant(PlatformVariant::Evdev);
        // EV_KEY BTN_SOUTH
        assert_eq!(layout.classify(0x0001_0130), Some(RawElement::Button(6)));
        // EV_KEY BTN_WEST
        assert_eq!(layout.classify(0x0001_0134), Some(RawElement::Button(10)));
        // EV_ABS ABS_RZ
        assert_eq!(layout.classify(0x0003_0005), Some(RawElement::Axis(5)));
        // EV_KEY below the gamepad range
        assert_eq!(layout.classify(0x0001_0020), None);
    }

    #[test]
    fn test_iokit_codes_share_a_base() {
        let layout = RawCodeLayout::for_variant(PlatformVariant::IoKit);
        assert_eq!(layout.classify(0x0009_0005), Some(RawElement::Button(14)));
        assert_eq!(layout.classify(0x0001_0034), Some(RawElement::Axis(14)));
    }
}
