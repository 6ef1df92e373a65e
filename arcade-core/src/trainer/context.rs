//! Mutable state of a training run.

/// State of the training loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    /// The memory is below the learning threshold; no optimization step is done.
    Collecting,

    /// One optimization step is done per environment step. Never reverts.
    Learning,

    /// The frame budget is exhausted.
    Done,
}

/// Counters and per-episode accumulators of a training run.
///
/// Created at the start of a run and passed to every
/// [`Trainer::train_step`](super::Trainer::train_step) call.
#[derive(Debug, Clone)]
pub struct TrainingContext<O> {
    /// The number of environment steps since the start of training. Never reset.
    pub frame_idx: usize,

    /// Sum of rewards of the current episode.
    pub episode_reward: f32,

    /// Total rewards of all completed episodes, in order.
    pub rewards_history: Vec<f32>,

    /// State of the training loop.
    pub state: TrainerState,

    /// The number of optimization steps.
    pub n_opts: usize,

    /// The number of completed episodes.
    pub episodes: usize,

    pub(super) episode_losses: Vec<f32>,

    // Observation the next action is selected from, `None` before the first reset.
    pub(super) obs: Option<O>,
}

impl<O> TrainingContext<O> {
    /// Creates the context of a new run.
    pub fn new() -> Self {
        Self {
            frame_idx: 0,
            episode_reward: 0.0,
            rewards_history: Vec::new(),
            state: TrainerState::Collecting,
            n_opts: 0,
            episodes: 0,
            episode_losses: Vec::new(),
            obs: None,
        }
    }
}

impl<O> Default for TrainingContext<O> {
    fn default() -> Self {
        Self::new()
    }
}
