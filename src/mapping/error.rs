//! Error definitions for profile construction

use thiserror::Error;

use super::mapping_types::{
    AnalogStick, ControllerModel, HatDirection, LogicalAxis, LogicalButton, PlatformVariant,
    RawIndex,
};

/// Authoring defects detected while building a [`Profile`](super::Profile).
///
/// None of these can occur at runtime once a profile exists; a profile that
/// fails to build is a bug in the table, not in the hardware.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("{model} on {variant}: buttons {first:?} and {second:?} share raw index {raw}")]
    ButtonCollision {
        model: ControllerModel,
        variant: PlatformVariant,
        first: LogicalButton,
        second: LogicalButton,
        raw: RawIndex,
    },

    #[error("{model} on {variant}: axes {first:?} and {second:?} share raw index {raw}")]
    AxisCollision {
        model: ControllerModel,
        variant: PlatformVariant,
        first: LogicalAxis,
        second: LogicalAxis,
        raw: RawIndex,
    },

    #[error("{model} on {variant}: button {button:?} and axis {axis:?} share raw index {raw} on a flat index space whose button and axis ranges must not overlap")]
    CrossKindCollision {
        model: ControllerModel,
        variant: PlatformVariant,
        button: LogicalButton,
        axis: LogicalAxis,
        raw: RawIndex,
    },

    #[error("{model} on {variant}: stick {stick:?} has no binding for {axis:?}")]
    IncompleteStick {
        model: ControllerModel,
        variant: PlatformVariant,
        stick: AnalogStick,
        axis: LogicalAxis,
    },

    #[error("{model} on {variant}: hat direction {direction:?} is bound to {button:?}, expected {expected:?}")]
    HatMismatch {
        model: ControllerModel,
        variant: PlatformVariant,
        button: LogicalButton,
        direction: HatDirection,
        expected: LogicalButton,
    },

    #[error("{model} on {variant}: {button:?} is synthesized from a hat but the profile has no hat")]
    MissingHat {
        model: ControllerModel,
        variant: PlatformVariant,
        button: LogicalButton,
    },
}
