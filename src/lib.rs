//! Gamepad input normalization.
//!
//! Raw button, axis and hat indices differ between host APIs and controller
//! models. This crate resolves them through per-model, per-API [`Profile`]s
//! into one logical input model and derives press/release edges for buttons,
//! stick deflection and triggers, advanced once per tick by a [`Gamepad`].

pub mod config;
pub mod controller;
pub mod mapping;

pub use config::{ConfigError, InputConfig};
pub use controller::{Gamepad, GamepadSettings, InputState, InputValue, RawSnapshot};
pub use mapping::{
    AnalogStick, ControllerModel, LogicalAxis, LogicalButton, PlatformVariant, Profile,
};
