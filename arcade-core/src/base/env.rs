//! Environment.
use super::{Info, Obs, Step};
use anyhow::Result;

/// Represents an environment with a discrete action space.
///
/// Actions are indices in `0..n_actions()`.
pub trait Env {
    /// Observation of the environment.
    type Obs: Obs;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    ///
    /// Failures of the underlying simulator are not retried; they are
    /// returned to the caller.
    fn step(&mut self, act: usize) -> Result<Step<Self>>
    where
        Self: Sized;

    /// The number of available actions.
    fn n_actions(&self) -> usize;

    /// Samples an action uniformly from the action space.
    fn sample_action(&mut self) -> usize;
}
