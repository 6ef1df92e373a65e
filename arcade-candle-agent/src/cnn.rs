//! Convolutional neural network for Atari games.
//!
//! The architecture is the same in the DQN Nature paper. Inputs are stacked
//! frames already scaled into `[0, 1]`, so no further normalization is applied.
mod base;
mod config;
pub use base::Cnn;
pub use config::CnnConfig;
