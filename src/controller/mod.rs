//! Controller subsystem: per-tick state derived from raw gamepad input
//!
//! Implements a single-threaded, tick-driven pipeline:
//!
//! 1. [`event_collector`] - gilrs events folded into a [`RawSnapshot`],
//!    D-pad routed to the profile's hat or buttons
//! 2. [`gamepad`] - raw snapshot resolved through the profile, every
//!    [`button_state`] machine and [`analog`] adapter advanced once
//! 3. [`signals`] - optional per-tick edge callbacks
//!
//! # Architecture
//!
//! ```text
//! gilrs ──► Collector ──► RawSnapshot ──► Gamepad::advance ──► queries / SignalHub
//!           (per event)   (level state)   (once per tick)
//! ```

pub mod analog;
pub mod button_state;
pub mod event_collector;
pub mod gamepad;
pub mod signals;
pub mod snapshot;

pub use analog::{AnalogAdapter, Deflection};
pub use button_state::{ButtonStateMachine, InputState};
pub use event_collector::{
    CollectorError, DpadRoute, EventCollector, EventFolder, PadIdentity, RawEvent,
};
pub use gamepad::{AnalogControl, Control, Gamepad, GamepadSettings, InputValue};
pub use signals::{Edge, EdgePool, Signal, SignalHub, SubscriptionId};
pub use snapshot::{RawCodeLayout, RawElement, RawSnapshot};
