//! Digital press/release derived from analog samples.
//!
//! An [`AnalogAdapter`] is a [`ButtonStateMachine`] whose `down` input is a
//! thresholded analog value instead of a hardware button bit.

use serde::{Deserialize, Serialize};

use tracing::warn;

use super::button_state::{ButtonStateMachine, InputState};

// Smallest magnitude a held control must drop below to release.
const MIN_RELEASE_POINT: f32 = 0.01;

/// Which deflections count toward the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deflection {
    /// Stick axis: either direction counts, `|sample| >= threshold`.
    TwoSided,
    /// Trigger or stick magnitude: `sample >= threshold`.
    OneSided,
}

impl Deflection {
    fn clamp(self, sample: f32) -> f32 {
        if !sample.is_finite() {
            return 0.0;
        }
        match self {
            Deflection::TwoSided => sample.clamp(-1.0, 1.0),
            Deflection::OneSided => sample.clamp(0.0, 1.0),
        }
    }

    fn magnitude(self, sample: f32) -> f32 {
        match self {
            Deflection::TwoSided => sample.abs(),
            Deflection::OneSided => sample,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalogAdapter {
    deflection: Deflection,
    threshold: f32,
    // Release point while held is `threshold - hysteresis`.
    hysteresis: f32,
    sample: f32,
    machine: ButtonStateMachine,
}

impl AnalogAdapter {
    pub fn new(deflection: Deflection, threshold: f32) -> Self {
        Self {
            deflection,
            threshold,
            hysteresis: 0.0,
            sample: 0.0,
            machine: ButtonStateMachine::new(),
        }
    }

    /// Lowers the release point of a held control to `threshold - hysteresis`.
    ///
    /// The release point stays above zero: a hysteresis at or beyond the
    /// threshold is cut down to just below it.
    pub fn with_hysteresis(mut self, hysteresis: f32) -> Self {
        let max = (self.threshold - MIN_RELEASE_POINT).max(0.0);
        if !hysteresis.is_finite() || hysteresis < 0.0 {
            warn!("Ignoring invalid hysteresis {}", hysteresis);
            self.hysteresis = 0.0;
        } else if hysteresis > max {
            warn!(
                "Hysteresis {} reaches threshold {}, using {}",
                hysteresis, self.threshold, max
            );
            self.hysteresis = max;
        } else {
            self.hysteresis = hysteresis;
        }
        self
    }

    /// Takes this tick's sample and advances the derived state once.
    pub fn advance(&mut self, sample: f32) -> InputState {
        self.sample = self.deflection.clamp(sample);
        let magnitude = self.deflection.magnitude(self.sample);

        let down = if self.machine.state().is_down() {
            magnitude >= self.threshold - self.hysteresis
        } else {
            magnitude >= self.threshold
        };
        self.machine.advance(down)
    }

    /// Clamped sample of the current tick.
    pub fn sample(&self) -> f32 {
        self.sample
    }

    pub fn state(&self) -> InputState {
        self.machine.state()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.sample = 0.0;
        self.machine.reset();
    }
}
