//! Translation from platform specific raw indices to logical controls.
//!
//! The [`tables`] hold one raw layout per controller model and host API,
//! [`Profile`] validates and indexes a table, and the [`resolver`] turns a
//! raw snapshot into logical button and axis values for one tick.

pub mod error;
pub mod mapping_types;
pub mod profile;
pub mod resolver;
pub mod tables;

pub use error::ProfileError;
pub use mapping_types::{
    AnalogStick, ControllerModel, HatDirection, HatSample, LogicalAxis, LogicalButton, LogicalId,
    PlatformVariant, RawIndex,
};
pub use profile::{AxisBinding, ButtonSource, IndexSpace, NativeRange, Profile};
pub use resolver::{normalize_axis, translate_axis, translate_button, translate_hat, ResolvedFrame};
