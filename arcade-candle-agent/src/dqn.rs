//! Action-value network of the DQN agent.
mod model;
pub use model::{DqnModel, DqnModelConfig};
