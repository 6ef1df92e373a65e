//! Exploration schedule.
use serde::{Deserialize, Serialize};

/// Linearly decaying epsilon for epsilon-greedy action selection.
///
/// `epsilon(f) = eps_final + (eps_start - eps_final) * max(0, final_step - f) / final_step`
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Epsilon at frame 0.
    pub eps_start: f64,

    /// Epsilon held from `final_step` onwards.
    pub eps_final: f64,

    /// The number of frames over which epsilon decays.
    pub final_step: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_final: 0.05,
            final_step: 500_000,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs the schedule with the default endpoints and the given decay length.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            final_step,
            ..Self::default()
        }
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the number of frames over which epsilon decays.
    pub fn final_step(mut self, v: usize) -> Self {
        self.final_step = v;
        self
    }

    /// Returns the exploration probability at the given frame.
    pub fn epsilon(&self, frame_idx: usize) -> f64 {
        if self.final_step == 0 {
            return self.eps_final;
        }
        let remaining = self.final_step.saturating_sub(frame_idx) as f64;
        self.eps_final + (self.eps_start - self.eps_final) * remaining / self.final_step as f64
    }
}
