//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// The number of transitions drawn for each optimization step.
    fn batch_size(&self) -> usize;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which a single batch is taken
    /// for updating model parameters. The returned record contains
    /// the loss under the key `"loss"`.
    fn opt(&mut self, buffer: &mut R) -> Result<Record>;

    /// Copies the parameters of the trained network into the target network.
    fn sync_target(&mut self) -> Result<()>;

    /// Saves the parameters of the trained network to the given file.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the parameters of the trained network from the given file.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
