//! Policy.
use super::Env;
use anyhow::Result;

/// A policy on an environment.
///
/// Policy is a deterministic mapping from an observation to an action.
/// Exploration is not part of the policy; the trainer mixes in random
/// actions itself.
pub trait Policy<E: Env> {
    /// Returns the greedy action for the given observation.
    fn act(&self, obs: &E::Obs) -> Result<usize>;
}
