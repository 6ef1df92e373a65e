//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
mod value_network;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use step::{Info, Step};
pub use value_network::ValueNetwork;
use std::fmt::Debug;

/// An observation of an environment.
///
/// Observations are stored in the replay memory and fed to value networks
/// in batches, so they must be able to write themselves into a flat buffer.
pub trait Obs: Clone + Debug {
    /// Shape of a single observation, without the batch dimension.
    fn shape(&self) -> Vec<usize>;

    /// Appends the values of the observation to `buf` in row-major order.
    fn extend_flat(&self, buf: &mut Vec<f32>);
}
