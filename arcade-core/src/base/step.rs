//! Environment step.
use super::Env;

/// Additional information to `Obs` and the reward.
pub trait Info {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
/// The trainer combines it with the previous observation to create a
/// [`Transition`](crate::replay_memory::Transition).
pub struct Step<E: Env> {
    /// Action.
    pub act: usize,

    /// Observation.
    pub obs: E::Obs,

    /// Reward, summed over the repeated low-level steps.
    pub reward: f32,

    /// Flag denoting if the episode reached a terminal state of the game.
    pub is_terminated: bool,

    /// Flag denoting if the episode was cut off by a time limit.
    pub is_truncated: bool,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: usize,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
