//! Interface of the game simulator wrapped by [`AtariEnv`](crate::AtariEnv).
use crate::RawFrame;
use anyhow::Result;
use arcade_core::Info;
use rand::Rng;

/// A discrete action space `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteActionSpace {
    /// The number of actions.
    pub n: usize,
}

impl DiscreteActionSpace {
    /// Samples an action uniformly.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        rng.gen_range(0..self.n)
    }

    /// Returns `true` if `action` is in the space.
    pub fn contains(&self, action: usize) -> bool {
        action < self.n
    }
}

/// Output of a single low-level simulator step.
#[derive(Debug, Clone)]
pub struct SimStep<I> {
    /// Screen after the step.
    pub frame: RawFrame,

    /// Reward of the step.
    pub reward: f32,

    /// The game reached a terminal state.
    pub is_terminated: bool,

    /// The episode was cut off by a time limit.
    pub is_truncated: bool,

    /// Backend specific information.
    pub info: I,
}

/// A frame-based game simulator.
pub trait Simulator {
    /// Backend specific information returned with every step.
    type Info: Info;

    /// Starts a new episode.
    fn reset(&mut self) -> Result<(RawFrame, Self::Info)>;

    /// Advances the game by one frame with the given action.
    fn step(&mut self, action: usize) -> Result<SimStep<Self::Info>>;

    /// The action space of the game.
    fn action_space(&self) -> DiscreteActionSpace;
}
