#![warn(missing_docs)]
//! Backend-independent parts of deep Q-learning on pixel observations.
//!
//! * [`Env`], [`Policy`], [`Agent`] and [`ValueNetwork`] are the seams between
//!   the training loop, the environment and the numeric backend.
//! * [`replay_memory::ReplayMemory`] stores transitions and samples batches.
//! * [`dqn::Dqn`] computes Bellman targets with a hard-updated target network.
//! * [`Trainer`] drives the training loop; [`Evaluator`] runs greedy episodes.
pub mod dqn;
pub mod error;
pub mod explorer;
pub mod record;
pub mod replay_memory;

mod base;
pub use base::{
    Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step, ValueNetwork,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Trainer, TrainerConfig, TrainerState, TrainingContext};

#[cfg(test)]
mod dummy;
