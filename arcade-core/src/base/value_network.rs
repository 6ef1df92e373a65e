//! Action-value function approximator.
use super::Obs;
use anyhow::Result;
use std::path::Path;

/// A parametric function mapping observations to action values.
///
/// The DQN agent owns two instances of the same implementor: the trained
/// network and the target network. The target network is only ever
/// changed through [`ValueNetwork::copy_parameters_from`].
pub trait ValueNetwork<O: Obs> {
    /// Snapshot of all parameters of the network.
    type Params: Clone;

    /// The number of actions, i.e., the output dimension.
    fn n_actions(&self) -> usize;

    /// Computes action values for a batch of observations.
    ///
    /// The returned vector has one row of length [`ValueNetwork::n_actions`]
    /// per observation.
    fn forward(&self, obs: &[O]) -> Result<Vec<Vec<f32>>>;

    /// Performs a single gradient step moving `Q(obs[i], actions[i])` towards
    /// `targets[i]` under the Huber loss, and returns the loss before the step.
    fn fit(&mut self, obs: &[O], actions: &[usize], targets: &[f32]) -> Result<f32>;

    /// Returns a deep copy of the parameters.
    fn parameters(&self) -> Result<Self::Params>;

    /// Overwrites all parameters with the given snapshot.
    fn load_parameters(&mut self, params: &Self::Params) -> Result<()>;

    /// Hard update: copies every parameter of `other` into `self`.
    fn copy_parameters_from(&mut self, other: &Self) -> Result<()>
    where
        Self: Sized,
    {
        let params = other.parameters()?;
        self.load_parameters(&params)
    }

    /// Writes the parameters to a file.
    fn save(&self, path: &Path) -> Result<()>;

    /// Reads the parameters from a file.
    fn load(&mut self, path: &Path) -> Result<()>;
}
