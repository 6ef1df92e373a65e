//! Transitions and batches of transitions.

/// A single observed transition `(o_t, a_t, r_t, o_t+1, terminal)`.
///
/// `is_terminated` is set only when the game itself ended. A time-limit
/// cutoff keeps it `false`, so the next state is still bootstrapped from.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    /// Observation before the action.
    pub state: O,

    /// Action taken.
    pub action: usize,

    /// Reward obtained.
    pub reward: f32,

    /// Observation after the action.
    pub next_state: O,

    /// Terminal flag used to mask the bootstrapped value.
    pub is_terminated: bool,
}

/// A batch of transitions decomposed into parallel arrays.
#[derive(Debug, Clone)]
pub struct TransitionBatch<O> {
    /// Observations before the actions.
    pub states: Vec<O>,

    /// Actions taken.
    pub actions: Vec<usize>,

    /// Rewards obtained.
    pub rewards: Vec<f32>,

    /// Observations after the actions.
    pub next_states: Vec<O>,

    /// Terminal flags.
    pub is_terminated: Vec<bool>,
}

impl<O> TransitionBatch<O> {
    /// Creates an empty batch with room for `capacity` transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            next_states: Vec::with_capacity(capacity),
            is_terminated: Vec::with_capacity(capacity),
        }
    }

    /// Appends a transition to the batch.
    pub fn push(&mut self, tr: Transition<O>) {
        self.states.push(tr.state);
        self.actions.push(tr.action);
        self.rewards.push(tr.reward);
        self.next_states.push(tr.next_state);
        self.is_terminated.push(tr.is_terminated);
    }

    /// The number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Unpacks the batch into `(states, actions, rewards, next_states, is_terminated)`.
    pub fn unpack(self) -> (Vec<O>, Vec<usize>, Vec<f32>, Vec<O>, Vec<bool>) {
        (
            self.states,
            self.actions,
            self.rewards,
            self.next_states,
            self.is_terminated,
        )
    }
}
