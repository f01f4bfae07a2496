//! Controller profiles: the validated, immutable form of a raw index table.

use std::collections::HashMap;
use tracing::{debug, info};

use super::error::ProfileError;
use super::mapping_types::{
    AnalogStick, ControllerModel, HatDirection, LogicalAxis, LogicalButton, PlatformVariant,
    RawIndex,
};
use super::tables::{self, ProfileTable};

/// Where a logical button comes from on a given profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSource {
    /// A real raw button index.
    Raw(RawIndex),
    /// Synthesized from the profile's hat switch. Not a raw index.
    Hat(HatDirection),
    /// The controller has no such control.
    Unsupported,
}

/// How raw button and axis indices relate to each other on an API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    /// Buttons and axes are reported through unrelated index spaces.
    Separate,
    /// One index space, with button and axis ranges that never overlap.
    FlatDisjoint,
    /// One index space where axis indices reuse button indices.
    FlatShared,
}

/// Native value range of a raw axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeRange {
    /// -1.0 ..= 1.0, centered at 0.0.
    Bipolar,
    /// 0.0 ..= 1.0, resting at 0.0.
    Unipolar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding {
    pub raw: RawIndex,
    pub range: NativeRange,
}

/// Mapping between logical controls and raw indices for one controller model
/// on one platform variant.
#[derive(Debug, Clone)]
pub struct Profile {
    model: ControllerModel,
    variant: PlatformVariant,
    index_space: IndexSpace,
    hat: Option<RawIndex>,
    buttons: HashMap<LogicalButton, ButtonSource>,
    axes: HashMap<LogicalAxis, AxisBinding>,
    raw_buttons: HashMap<RawIndex, LogicalButton>,
    raw_axes: HashMap<RawIndex, LogicalAxis>,
}

impl Profile {
    /// Builds the profile for a model on a platform variant.
    pub fn new(model: ControllerModel, variant: PlatformVariant) -> Result<Self, ProfileError> {
        let profile = Self::from_table(tables::lookup(model, variant))?;
        info!(
            "Selected {} profile for {} ({} buttons, {} axes)",
            model,
            variant,
            profile.supported_buttons().count(),
            profile.axes.len()
        );
        Ok(profile)
    }

    /// Validates a table and builds the lookup maps.
    ///
    /// Any raw index used twice within one kind of control is rejected, as is
    /// any overlap between buttons and axes on a flat index space that keeps
    /// the two ranges apart.
    pub fn from_table(table: &ProfileTable) -> Result<Self, ProfileError> {
        let model = table.model;
        let variant = table.variant;

        let mut buttons = HashMap::new();
        let mut raw_buttons: HashMap<RawIndex, LogicalButton> = HashMap::new();
        for &(button, source) in table.buttons {
            match source {
                ButtonSource::Raw(raw) => {
                    if let Some(&first) = raw_buttons.get(&raw) {
                        return Err(ProfileError::ButtonCollision {
                            model,
                            variant,
                            first,
                            second: button,
                            raw,
                        });
                    }
                    raw_buttons.insert(raw, button);
                }
                ButtonSource::Hat(direction) => {
                    if table.hat.is_none() {
                        return Err(ProfileError::MissingHat {
                            model,
                            variant,
                            button,
                        });
                    }
                    if direction.button() != button {
                        return Err(ProfileError::HatMismatch {
                            model,
                            variant,
                            button,
                            direction,
                            expected: direction.button(),
                        });
                    }
                }
                ButtonSource::Unsupported => {}
            }
            buttons.insert(button, source);
        }

        let mut axes = HashMap::new();
        let mut raw_axes: HashMap<RawIndex, LogicalAxis> = HashMap::new();
        for &(axis, binding) in table.axes {
            if let Some(&first) = raw_axes.get(&binding.raw) {
                return Err(ProfileError::AxisCollision {
                    model,
                    variant,
                    first,
                    second: axis,
                    raw: binding.raw,
                });
            }
            if table.index_space == IndexSpace::FlatDisjoint {
                if let Some(&button) = raw_buttons.get(&binding.raw) {
                    return Err(ProfileError::CrossKindCollision {
                        model,
                        variant,
                        button,
                        axis,
                        raw: binding.raw,
                    });
                }
            }
            raw_axes.insert(binding.raw, axis);
            axes.insert(axis, binding);
        }

        for stick in AnalogStick::ALL {
            let (x, y) = stick.axes();
            for axis in [x, y] {
                if !axes.contains_key(&axis) {
                    return Err(ProfileError::IncompleteStick {
                        model,
                        variant,
                        stick,
                        axis,
                    });
                }
            }
        }

        debug!(
            "Validated {} table on {}: {:?} index space",
            model, variant, table.index_space
        );

        Ok(Self {
            model,
            variant,
            index_space: table.index_space,
            hat: table.hat,
            buttons,
            axes,
            raw_buttons,
            raw_axes,
        })
    }

    pub fn model(&self) -> ControllerModel {
        self.model
    }

    pub fn variant(&self) -> PlatformVariant {
        self.variant
    }

    pub fn index_space(&self) -> IndexSpace {
        self.index_space
    }

    /// Raw hat index feeding the synthesized D-pad.
    pub fn hat_index(&self) -> Option<RawIndex> {
        self.hat
    }

    /// Where `button` lives on this profile.
    pub fn resolve(&self, button: LogicalButton) -> ButtonSource {
        self.buttons
            .get(&button)
            .copied()
            .unwrap_or(ButtonSource::Unsupported)
    }

    pub fn supports(&self, button: LogicalButton) -> bool {
        self.resolve(button) != ButtonSource::Unsupported
    }

    pub fn supported_buttons(&self) -> impl Iterator<Item = LogicalButton> + '_ {
        LogicalButton::ALL
            .into_iter()
            .filter(move |button| self.supports(*button))
    }

    pub fn axis(&self, axis: LogicalAxis) -> Option<AxisBinding> {
        self.axes.get(&axis).copied()
    }

    /// Raw (x, y) axis indices of a stick.
    pub fn stick_axes(&self, stick: AnalogStick) -> Option<(RawIndex, RawIndex)> {
        let (x, y) = stick.axes();
        Some((self.axes.get(&x)?.raw, self.axes.get(&y)?.raw))
    }

    /// Logical button bound to a raw button index.
    pub fn button_at(&self, raw: RawIndex) -> Option<LogicalButton> {
        self.raw_buttons.get(&raw).copied()
    }

    /// Logical axis bound to a raw axis index.
    pub fn axis_at(&self, raw: RawIndex) -> Option<LogicalAxis> {
        self.raw_axes.get(&raw).copied()
    }
}
