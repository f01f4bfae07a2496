//! Static raw index tables, one per controller model and platform variant.
//!
//! Each table lists where a logical control lives in the raw numbering of a
//! host API. Controls missing from a table are unsupported on that
//! combination. Nothing outside this file may assume anything about the
//! numeric ranges used here.

use super::mapping_types::{
    ControllerModel, HatDirection, LogicalAxis, LogicalButton, PlatformVariant, RawIndex,
};
use super::profile::{AxisBinding, ButtonSource, IndexSpace, NativeRange};

use ButtonSource::{Hat, Raw};
use LogicalAxis::*;
use LogicalButton::*;

/// Raw layout of one controller model under one host API.
#[derive(Debug)]
pub struct ProfileTable {
    pub model: ControllerModel,
    pub variant: PlatformVariant,
    pub index_space: IndexSpace,
    /// Raw hat index feeding the synthesized D-pad, if the API has no
    /// first-class D-pad buttons.
    pub hat: Option<RawIndex>,
    pub buttons: &'static [(LogicalButton, ButtonSource)],
    pub axes: &'static [(LogicalAxis, AxisBinding)],
}

const fn axis(raw: RawIndex, range: NativeRange) -> AxisBinding {
    AxisBinding { raw, range }
}

const HAT_DPAD: [(LogicalButton, ButtonSource); 4] = [
    (DpadUp, Hat(HatDirection::Up)),
    (DpadDown, Hat(HatDirection::Down)),
    (DpadLeft, Hat(HatDirection::Left)),
    (DpadRight, Hat(HatDirection::Right)),
];

// DirectInput: buttons counted from 0 (west face first), axes in their own
// space. Triggers arrive as 0.0 ..= 1.0 button values on axes 3 and 4.
pub static DUALSHOCK4_DIRECTINPUT: ProfileTable = ProfileTable {
    model: ControllerModel::DualShock4,
    variant: PlatformVariant::DirectInput,
    index_space: IndexSpace::Separate,
    hat: Some(0),
    buttons: &[
        (Square, Raw(0)),
        (Cross, Raw(1)),
        (Circle, Raw(2)),
        (Triangle, Raw(3)),
        (L1, Raw(4)),
        (R1, Raw(5)),
        (L2, Raw(6)),
        (R2, Raw(7)),
        (Share, Raw(8)),
        (Options, Raw(9)),
        (L3, Raw(10)),
        (R3, Raw(11)),
        (Ps, Raw(12)),
        (Touchpad, Raw(13)),
        HAT_DPAD[0],
        HAT_DPAD[1],
        HAT_DPAD[2],
        HAT_DPAD[3],
    ],
    axes: &[
        (LeftStickX, axis(0, NativeRange::Bipolar)),
        (LeftStickY, axis(1, NativeRange::Bipolar)),
        (RightStickX, axis(2, NativeRange::Bipolar)),
        (LeftTrigger, axis(3, NativeRange::Unipolar)),
        (RightTrigger, axis(4, NativeRange::Unipolar)),
        (RightStickY, axis(5, NativeRange::Bipolar)),
    ],
};

// evdev: ABS_X..ABS_RZ occupy 0..=5, key codes follow from BTN_SOUTH at 6.
// The touchpad click lives on a separate input device.
pub static DUALSHOCK4_EVDEV: ProfileTable = ProfileTable {
    model: ControllerModel::DualShock4,
    variant: PlatformVariant::Evdev,
    index_space: IndexSpace::FlatDisjoint,
    hat: Some(0),
    buttons: &[
        (Cross, Raw(6)),
        (Circle, Raw(7)),
        (Triangle, Raw(9)),
        (Square, Raw(10)),
        (L1, Raw(12)),
        (R1, Raw(13)),
        (L2, Raw(14)),
        (R2, Raw(15)),
        (Share, Raw(16)),
        (Options, Raw(17)),
        (Ps, Raw(18)),
        (L3, Raw(19)),
        (R3, Raw(20)),
        HAT_DPAD[0],
        HAT_DPAD[1],
        HAT_DPAD[2],
        HAT_DPAD[3],
    ],
    axes: &[
        (LeftStickX, axis(0, NativeRange::Bipolar)),
        (LeftStickY, axis(1, NativeRange::Bipolar)),
        (LeftTrigger, axis(2, NativeRange::Unipolar)),
        (RightStickX, axis(3, NativeRange::Bipolar)),
        (RightStickY, axis(4, NativeRange::Bipolar)),
        (RightTrigger, axis(5, NativeRange::Unipolar)),
    ],
};

// IOKit: buttons and axes both start at 10, so axis 14 and button 14 are two
// different controls.
pub static DUALSHOCK4_IOKIT: ProfileTable = ProfileTable {
    model: ControllerModel::DualShock4,
    variant: PlatformVariant::IoKit,
    index_space: IndexSpace::FlatShared,
    hat: None,
    buttons: &[
        (Square, Raw(10)),
        (Cross, Raw(11)),
        (Circle, Raw(12)),
        (Triangle, Raw(13)),
        (L1, Raw(14)),
        (R1, Raw(15)),
        (L2, Raw(16)),
        (R2, Raw(17)),
        (Share, Raw(18)),
        (Options, Raw(19)),
        (L3, Raw(20)),
        (R3, Raw(21)),
        (Ps, Raw(22)),
        (Touchpad, Raw(23)),
        (DpadUp, Raw(24)),
        (DpadDown, Raw(25)),
        (DpadLeft, Raw(26)),
        (DpadRight, Raw(27)),
    ],
    axes: &[
        (LeftStickX, axis(10, NativeRange::Bipolar)),
        (LeftStickY, axis(11, NativeRange::Bipolar)),
        (RightStickX, axis(12, NativeRange::Bipolar)),
        (LeftTrigger, axis(13, NativeRange::Unipolar)),
        (RightTrigger, axis(14, NativeRange::Unipolar)),
        (RightStickY, axis(15, NativeRange::Bipolar)),
    ],
};

// XInput pads share the DirectInput numbering but expose no guide button
// and no digital trigger bits.
pub static XBOX360_DIRECTINPUT: ProfileTable = ProfileTable {
    model: ControllerModel::Xbox360,
    variant: PlatformVariant::DirectInput,
    index_space: IndexSpace::Separate,
    hat: Some(0),
    buttons: &[
        (Square, Raw(0)),
        (Cross, Raw(1)),
        (Circle, Raw(2)),
        (Triangle, Raw(3)),
        (L1, Raw(4)),
        (R1, Raw(5)),
        (Share, Raw(8)),
        (Options, Raw(9)),
        (L3, Raw(10)),
        (R3, Raw(11)),
        HAT_DPAD[0],
        HAT_DPAD[1],
        HAT_DPAD[2],
        HAT_DPAD[3],
    ],
    axes: &[
        (LeftStickX, axis(0, NativeRange::Bipolar)),
        (LeftStickY, axis(1, NativeRange::Bipolar)),
        (RightStickX, axis(2, NativeRange::Bipolar)),
        (LeftTrigger, axis(3, NativeRange::Unipolar)),
        (RightTrigger, axis(4, NativeRange::Unipolar)),
        (RightStickY, axis(5, NativeRange::Bipolar)),
    ],
};

pub static XBOX360_EVDEV: ProfileTable = ProfileTable {
    model: ControllerModel::Xbox360,
    variant: PlatformVariant::Evdev,
    index_space: IndexSpace::FlatDisjoint,
    hat: Some(0),
    buttons: &[
        (Cross, Raw(6)),
        (Circle, Raw(7)),
        (Square, Raw(9)),
        (Triangle, Raw(10)),
        (L1, Raw(12)),
        (R1, Raw(13)),
        (Share, Raw(16)),
        (Options, Raw(17)),
        (Ps, Raw(18)),
        (L3, Raw(19)),
        (R3, Raw(20)),
        HAT_DPAD[0],
        HAT_DPAD[1],
        HAT_DPAD[2],
        HAT_DPAD[3],
    ],
    axes: &[
        (LeftStickX, axis(0, NativeRange::Bipolar)),
        (LeftStickY, axis(1, NativeRange::Bipolar)),
        (LeftTrigger, axis(2, NativeRange::Unipolar)),
        (RightStickX, axis(3, NativeRange::Bipolar)),
        (RightStickY, axis(4, NativeRange::Bipolar)),
        (RightTrigger, axis(5, NativeRange::Unipolar)),
    ],
};

pub static XBOX360_IOKIT: ProfileTable = ProfileTable {
    model: ControllerModel::Xbox360,
    variant: PlatformVariant::IoKit,
    index_space: IndexSpace::FlatShared,
    hat: None,
    buttons: &[
        (Cross, Raw(10)),
        (Circle, Raw(11)),
        (Square, Raw(12)),
        (Triangle, Raw(13)),
        (L1, Raw(14)),
        (R1, Raw(15)),
        (L3, Raw(16)),
        (R3, Raw(17)),
        (Options, Raw(18)),
        (Share, Raw(19)),
        (Ps, Raw(20)),
        (DpadUp, Raw(21)),
        (DpadDown, Raw(22)),
        (DpadLeft, Raw(23)),
        (DpadRight, Raw(24)),
    ],
    axes: &[
        (LeftStickX, axis(10, NativeRange::Bipolar)),
        (LeftStickY, axis(11, NativeRange::Bipolar)),
        (RightStickX, axis(12, NativeRange::Bipolar)),
        (RightStickY, axis(13, NativeRange::Bipolar)),
        (LeftTrigger, axis(14, NativeRange::Unipolar)),
        (RightTrigger, axis(15, NativeRange::Unipolar)),
    ],
};

pub static ALL_TABLES: [&ProfileTable; 6] = [
    &DUALSHOCK4_DIRECTINPUT,
    &DUALSHOCK4_EVDEV,
    &DUALSHOCK4_IOKIT,
    &XBOX360_DIRECTINPUT,
    &XBOX360_EVDEV,
    &XBOX360_IOKIT,
];

/// Table for a model and variant. Every combination is covered.
pub fn lookup(model: ControllerModel, variant: PlatformVariant) -> &'static ProfileTable {
    match (model, variant) {
        (ControllerModel::DualShock4, PlatformVariant::DirectInput) => &DUALSHOCK4_DIRECTINPUT,
        (ControllerModel::DualShock4, PlatformVariant::Evdev) => &DUALSHOCK4_EVDEV,
        (ControllerModel::DualShock4, PlatformVariant::IoKit) => &DUALSHOCK4_IOKIT,
        (ControllerModel::Xbox360, PlatformVariant::DirectInput) => &XBOX360_DIRECTINPUT,
        (ControllerModel::Xbox360, PlatformVariant::Evdev) => &XBOX360_EVDEV,
        (ControllerModel::Xbox360, PlatformVariant::IoKit) => &XBOX360_IOKIT,
    }
}
