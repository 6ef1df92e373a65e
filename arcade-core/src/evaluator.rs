//! Evaluate [`Policy`].
use crate::{Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluates a policy without learning.
pub trait Evaluator<E: Env> {
    /// Runs the policy greedily and returns the total reward of each episode.
    ///
    /// The policy is taken by shared reference, so its parameters cannot change.
    fn evaluate<P: Policy<E>>(&mut self, policy: &P) -> Result<Vec<f32>>;
}
