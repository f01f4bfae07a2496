//! Hardware-independent identifiers shared by the profile tables, the
//! resolver and the gamepad aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a button, axis or hat as reported by the host input API.
pub type RawIndex = u16;

/// Logical button, named after the PlayStation layout.
///
/// Xbox style pads map onto the same positions: A is `Cross`, B is `Circle`,
/// X is `Square`, Y is `Triangle`, Back is `Share`, Start is `Options` and
/// Guide is `Ps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicalButton {
    Square,
    Cross,
    Circle,
    Triangle,
    L1,
    R1,
    L2,
    R2,
    Share,
    Options,
    L3,
    R3,
    Ps,
    Touchpad,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl LogicalButton {
    pub const ALL: [LogicalButton; 18] = [
        LogicalButton::Square,
        LogicalButton::Cross,
        LogicalButton::Circle,
        LogicalButton::Triangle,
        LogicalButton::L1,
        LogicalButton::R1,
        LogicalButton::L2,
        LogicalButton::R2,
        LogicalButton::Share,
        LogicalButton::Options,
        LogicalButton::L3,
        LogicalButton::R3,
        LogicalButton::Ps,
        LogicalButton::Touchpad,
        LogicalButton::DpadUp,
        LogicalButton::DpadDown,
        LogicalButton::DpadLeft,
        LogicalButton::DpadRight,
    ];

    pub fn is_dpad(self) -> bool {
        matches!(
            self,
            LogicalButton::DpadUp
                | LogicalButton::DpadDown
                | LogicalButton::DpadLeft
                | LogicalButton::DpadRight
        )
    }
}

/// Logical analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicalAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

impl LogicalAxis {
    pub const ALL: [LogicalAxis; 6] = [
        LogicalAxis::LeftStickX,
        LogicalAxis::LeftStickY,
        LogicalAxis::RightStickX,
        LogicalAxis::RightStickY,
        LogicalAxis::LeftTrigger,
        LogicalAxis::RightTrigger,
    ];

    /// Triggers rest at 0.0 and only deflect one way.
    pub fn is_trigger(self) -> bool {
        matches!(self, LogicalAxis::LeftTrigger | LogicalAxis::RightTrigger)
    }
}

/// A two-axis analog stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnalogStick {
    Left,
    Right,
}

impl AnalogStick {
    pub const ALL: [AnalogStick; 2] = [AnalogStick::Left, AnalogStick::Right];

    /// The logical (x, y) axes making up this stick.
    pub fn axes(self) -> (LogicalAxis, LogicalAxis) {
        match self {
            AnalogStick::Left => (LogicalAxis::LeftStickX, LogicalAxis::LeftStickY),
            AnalogStick::Right => (LogicalAxis::RightStickX, LogicalAxis::RightStickY),
        }
    }
}

/// One of the four cardinal directions of a hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HatDirection {
    Up,
    Down,
    Left,
    Right,
}

impl HatDirection {
    /// The D-pad button synthesized for this direction.
    pub fn button(self) -> LogicalButton {
        match self {
            HatDirection::Up => LogicalButton::DpadUp,
            HatDirection::Down => LogicalButton::DpadDown,
            HatDirection::Left => LogicalButton::DpadLeft,
            HatDirection::Right => LogicalButton::DpadRight,
        }
    }
}

/// Position of an eight-way hat switch as sampled this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatSample {
    #[default]
    Centered,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl HatSample {
    /// Builds a sample from a DirectInput style POV reading in hundredths of
    /// a degree, clockwise from north. `None` (or 0xFFFF) means centered.
    pub fn from_pov(hundredths: Option<u16>) -> Self {
        let Some(value) = hundredths.filter(|v| *v != u16::MAX) else {
            return HatSample::Centered;
        };
        // Snap to the nearest 45 degree sector.
        let sector = ((u32::from(value) + 2250) / 4500) % 8;
        match sector {
            0 => HatSample::Up,
            1 => HatSample::UpRight,
            2 => HatSample::Right,
            3 => HatSample::DownRight,
            4 => HatSample::Down,
            5 => HatSample::DownLeft,
            6 => HatSample::Left,
            _ => HatSample::UpLeft,
        }
    }

    /// Builds a sample from evdev style hat axes where each axis reports
    /// -1, 0 or 1 and negative y points up.
    pub fn from_axes(x: i32, y: i32) -> Self {
        match (x.signum(), y.signum()) {
            (0, -1) => HatSample::Up,
            (1, -1) => HatSample::UpRight,
            (1, 0) => HatSample::Right,
            (1, 1) => HatSample::DownRight,
            (0, 1) => HatSample::Down,
            (-1, 1) => HatSample::DownLeft,
            (-1, 0) => HatSample::Left,
            (-1, -1) => HatSample::UpLeft,
            _ => HatSample::Centered,
        }
    }

    /// Builds a sample from four independent direction flags. Opposing
    /// directions cancel out.
    pub fn from_flags(up: bool, down: bool, left: bool, right: bool) -> Self {
        let x = i32::from(right) - i32::from(left);
        let y = i32::from(down) - i32::from(up);
        Self::from_axes(x, y)
    }

    /// Cardinal directions held in this sample.
    pub fn directions(self) -> &'static [HatDirection] {
        use HatDirection::*;
        match self {
            HatSample::Centered => &[],
            HatSample::Up => &[Up],
            HatSample::UpRight => &[Up, Right],
            HatSample::Right => &[Right],
            HatSample::DownRight => &[Down, Right],
            HatSample::Down => &[Down],
            HatSample::DownLeft => &[Down, Left],
            HatSample::Left => &[Left],
            HatSample::UpLeft => &[Up, Left],
        }
    }

    pub fn contains(self, direction: HatDirection) -> bool {
        self.directions().contains(&direction)
    }
}

/// Resolved identity of a raw sample.
///
/// Each kind of control lives in its own variant, so an axis can never be
/// mistaken for a button even on APIs where both share one index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalId {
    Button(LogicalButton),
    Axis(LogicalAxis),
    /// D-pad direction synthesized from a hat sample.
    Hat(HatDirection),
    /// Axis index the profile does not know about, passed through unchanged.
    RawAxis(RawIndex),
    /// Button index the profile does not know about, passed through unchanged.
    RawButton(RawIndex),
}

/// Host input API whose raw numbering a profile follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformVariant {
    /// Windows DirectInput: buttons from 0, axes in their own index space,
    /// D-pad reported as a POV hat.
    DirectInput,
    /// Linux evdev flattened: six absolute axes at 0..=5, key codes follow
    /// from 6, D-pad reported through the hat axes.
    Evdev,
    /// macOS IOKit HID elements: axes and buttons are numbered from the same
    /// base, so raw axis indices collide with raw button indices. D-pad is
    /// reported as four real buttons.
    IoKit,
}

impl PlatformVariant {
    pub const ALL: [PlatformVariant; 3] = [
        PlatformVariant::DirectInput,
        PlatformVariant::Evdev,
        PlatformVariant::IoKit,
    ];

    /// Picks the variant matching the operating system we are running on.
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        match os {
            "linux" | "android" | "freebsd" => PlatformVariant::Evdev,
            "macos" | "ios" => PlatformVariant::IoKit,
            _ => PlatformVariant::DirectInput,
        }
    }
}

impl fmt::Display for PlatformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformVariant::DirectInput => write!(f, "DirectInput"),
            PlatformVariant::Evdev => write!(f, "evdev"),
            PlatformVariant::IoKit => write!(f, "IOKit"),
        }
    }
}

/// Controller hardware family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerModel {
    DualShock4,
    Xbox360,
}

const SONY_VENDOR_ID: u16 = 0x054C;
const MICROSOFT_VENDOR_ID: u16 = 0x045E;

impl ControllerModel {
    pub const ALL: [ControllerModel; 2] = [ControllerModel::DualShock4, ControllerModel::Xbox360];

    /// Guesses the model from USB vendor id and product name. Unknown pads are
    /// treated as XInput compatible.
    pub fn identify(vendor_id: Option<u16>, name: &str) -> Self {
        match vendor_id {
            Some(SONY_VENDOR_ID) => return ControllerModel::DualShock4,
            Some(MICROSOFT_VENDOR_ID) => return ControllerModel::Xbox360,
            _ => {}
        }

        let name = name.to_lowercase();
        if name.contains("dualshock")
            || name.contains("wireless controller")
            || name.contains("ps4")
            || name.contains("sony")
        {
            ControllerModel::DualShock4
        } else {
            ControllerModel::Xbox360
        }
    }
}

impl fmt::Display for ControllerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerModel::DualShock4 => write!(f, "DualShock 4"),
            ControllerModel::Xbox360 => write!(f, "Xbox 360"),
        }
    }
}
