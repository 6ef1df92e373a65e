//! DQN agent with a hard-updated target network.
mod base;
mod config;
pub use base::{argmax, bellman_targets, Dqn};
pub use config::DqnConfig;
