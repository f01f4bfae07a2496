//! Per-tick edge notifications on top of the gamepad query surface.
//!
//! The hub owns both its subscriptions and the buffers it recycles between
//! ticks; nothing here is process-wide.

use std::collections::HashSet;
use tracing::debug;

use super::gamepad::{AnalogControl, Gamepad};
use crate::mapping::LogicalButton;

/// An edge a consumer can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Pressed(LogicalButton),
    Released(LogicalButton),
    Moved(AnalogControl),
    MoveEnded(AnalogControl),
}

impl Signal {
    fn fired(self, gamepad: &Gamepad) -> bool {
        match self {
            Signal::Pressed(button) => gamepad.just_pressed(button),
            Signal::Released(button) => gamepad.just_released_button(button),
            Signal::Moved(control) => gamepad.just_moved(control),
            Signal::MoveEnded(control) => gamepad.just_released(control),
        }
    }
}

/// Payload handed to callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub signal: Signal,
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    signal: Signal,
    callback: Box<dyn FnMut(&Edge)>,
}

/// Recycles edge buffers so dispatching does not allocate every tick.
#[derive(Debug, Default)]
pub struct EdgePool {
    free: Vec<Vec<Edge>>,
}

impl EdgePool {
    pub fn acquire(&mut self) -> Vec<Edge> {
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, mut buffer: Vec<Edge>) {
        buffer.clear();
        self.free.push(buffer);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

#[derive(Default)]
pub struct SignalHub {
    subscriptions: Vec<Subscription>,
    pool: EdgePool,
    next_id: u64,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `signal`. Callbacks run synchronously inside
    /// [`dispatch`](Self::dispatch), in subscription order.
    pub fn subscribe<F>(&mut self, signal: Signal, callback: F) -> SubscriptionId
    where
        F: FnMut(&Edge) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            signal,
            callback: Box::new(callback),
        });
        debug!("Subscribed {:?} to {:?}", id, signal);
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Signals with at least one subscriber.
    pub fn active_signals(&self) -> HashSet<Signal> {
        self.subscriptions.iter().map(|s| s.signal).collect()
    }

    /// Checks every subscribed signal against this tick's gamepad state and
    /// invokes the matching callbacks in subscription order. Call once per
    /// tick, after [`Gamepad::advance`]. Returns the number of callbacks
    /// invoked.
    pub fn dispatch(&mut self, gamepad: &Gamepad) -> usize {
        let mut edges = self.pool.acquire();
        for subscription in &self.subscriptions {
            let signal = subscription.signal;
            if !edges.iter().any(|e| e.signal == signal) && signal.fired(gamepad) {
                edges.push(Edge {
                    signal,
                    tick: gamepad.tick(),
                });
            }
        }

        let mut invoked = 0;
        if !edges.is_empty() {
            for subscription in self.subscriptions.iter_mut() {
                if let Some(edge) = edges.iter().find(|e| e.signal == subscription.signal) {
                    (subscription.callback)(edge);
                    invoked += 1;
                }
            }
        }

        self.pool.release(edges);
        invoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::gamepad::GamepadSettings;
    use crate::controller::snapshot::RawSnapshot;
    use crate::mapping::{ControllerModel, LogicalAxis, PlatformVariant};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pad() -> Gamepad {
        Gamepad::attach(
            ControllerModel::DualShock4,
            PlatformVariant::DirectInput,
            &GamepadSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_dispatch_fires_once_per_edge() {
        let mut pad = pad();
        let mut hub = SignalHub::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        hub.subscribe(Signal::Pressed(LogicalButton::Square), move |edge| {
            sink.borrow_mut().push(*edge)
        });
        let sink = seen.clone();
        hub.subscribe(Signal::Released(LogicalButton::Square), move |edge| {
            sink.borrow_mut().push(*edge)
        });

        for down in [true, true, false, false] {
            let mut snapshot = RawSnapshot::new();
            snapshot.set_button(0, down);
            pad.advance(&mut snapshot);
            hub.dispatch(&pad);
        }

        assert_eq!(
            *seen.borrow(),
            vec![
                Edge {
                    signal: Signal::Pressed(LogicalButton::Square),
                    tick: 1
                },
                Edge {
                    signal: Signal::Released(LogicalButton::Square),
                    tick: 3
                },
            ]
        );
    }

    #[test]
    fn test_analog_signals() {
        let mut pad = pad();
        let mut hub = SignalHub::new();
        let moved = Rc::new(RefCell::new(0));

        let counter = moved.clone();
        hub.subscribe(
            Signal::Moved(AnalogControl::Axis(LogicalAxis::LeftTrigger)),
            move |_| *counter.borrow_mut() += 1,
        );

        let mut snapshot = RawSnapshot::new();
        snapshot.set_axis(3, 1.0);
        pad.advance(&mut snapshot);
        assert_eq!(hub.dispatch(&pad), 1);
        pad.advance(&mut snapshot);
        assert_eq!(hub.dispatch(&pad), 0);
        assert_eq!(*moved.borrow(), 1);
    }

    #[test]
    fn test_callbacks_run_in_subscription_order() {
        let mut pad = pad();
        let mut hub = SignalHub::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let buttons = [
            LogicalButton::Triangle,
            LogicalButton::Square,
            LogicalButton::R1,
            LogicalButton::Cross,
            LogicalButton::Options,
            LogicalButton::L3,
        ];
        for button in buttons {
            let sink = order.clone();
            hub.subscribe(Signal::Pressed(button), move |_| sink.borrow_mut().push(button));
        }
        let sink = order.clone();
        hub.subscribe(Signal::Pressed(LogicalButton::Square), move |_| {
            sink.borrow_mut().push(LogicalButton::Square)
        });

        let mut snapshot = RawSnapshot::new();
        for raw in 0..12 {
            snapshot.set_button(raw, true);
        }
        pad.advance(&mut snapshot);
        assert_eq!(hub.dispatch(&pad), 7);

        let mut expected = buttons.to_vec();
        expected.push(LogicalButton::Square);
        assert_eq!(*order.borrow(), expected);
    }

    #[test]
    fn test_unsubscribe_and_pool_reuse() {
        let mut pad = pad();
        let mut hub = SignalHub::new();
        let id = hub.subscribe(Signal::Pressed(LogicalButton::Cross), |_| {});
        assert_eq!(hub.active_signals().len(), 1);

        pad.advance(&mut RawSnapshot::new());
        hub.dispatch(&pad);
        assert_eq!(hub.pool.available(), 1);

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert!(hub.active_signals().is_empty());
    }
}
