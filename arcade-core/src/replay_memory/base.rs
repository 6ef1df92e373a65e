//! Ring-buffer replay memory.
use super::{ReplayMemoryConfig, Transition, TransitionBatch};
use crate::{error::ArcadeError, ExperienceBufferBase, Obs, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::collections::{vec_deque::Iter, VecDeque};

/// A bounded collection of transitions.
///
/// Once `capacity` transitions are stored, each push evicts the oldest one.
/// Batches are drawn uniformly at random without replacement.
pub struct ReplayMemory<O> {
    capacity: usize,
    buffer: VecDeque<Transition<O>>,
    rng: StdRng,
}

impl<O: Obs> ReplayMemory<O> {
    /// Constructs an empty memory.
    pub fn new(config: &ReplayMemoryConfig) -> Self {
        Self {
            capacity: config.capacity,
            buffer: VecDeque::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// The maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> Iter<'_, Transition<O>> {
        self.buffer.iter()
    }

    /// Draws `batch_size` distinct transitions uniformly at random.
    ///
    /// Returns [`ArcadeError::InsufficientSamples`] if fewer than `batch_size`
    /// transitions are stored.
    pub fn sample(&mut self, batch_size: usize) -> Result<TransitionBatch<O>> {
        let available = self.buffer.len();
        if available < batch_size {
            return Err(ArcadeError::InsufficientSamples {
                requested: batch_size,
                available,
            }
            .into());
        }

        let ixs = index::sample(&mut self.rng, available, batch_size);
        let mut batch = TransitionBatch::with_capacity(batch_size);
        for ix in ixs.iter() {
            batch.push(self.buffer[ix].clone());
        }
        Ok(batch)
    }
}

impl<O: Obs> ExperienceBufferBase for ReplayMemory<O> {
    type Item = Transition<O>;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl<O: Obs> ReplayBufferBase for ReplayMemory<O> {
    type Batch = TransitionBatch<O>;

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        self.sample(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummyObs;

    fn transition(reward: f32) -> Transition<DummyObs> {
        Transition {
            state: DummyObs(reward),
            action: 0,
            reward,
            next_state: DummyObs(reward + 1.0),
            is_terminated: false,
        }
    }

    fn memory(capacity: usize) -> ReplayMemory<DummyObs> {
        ReplayMemory::new(&ReplayMemoryConfig::default().capacity(capacity))
    }

    #[test]
    fn test_evicts_oldest_when_full() -> Result<()> {
        for capacity in 1..8 {
            for n in (capacity + 1)..(3 * capacity + 2) {
                let mut mem = memory(capacity);
                for i in 0..n {
                    mem.push(transition(i as f32))?;
                }
                assert_eq!(mem.len(), capacity);
                let rewards = mem.iter().map(|tr| tr.reward).collect::<Vec<_>>();
                let expected = ((n - capacity)..n).map(|i| i as f32).collect::<Vec<_>>();
                assert_eq!(rewards, expected);
            }
        }
        Ok(())
    }

    #[test]
    fn test_sample_distinct() -> Result<()> {
        let mut mem = memory(100);
        for i in 0..50 {
            mem.push(transition(i as f32))?;
        }
        for batch_size in [1usize, 7, 16, 50].iter() {
            let batch = mem.sample(*batch_size)?;
            assert_eq!(batch.len(), *batch_size);
            let mut rewards = batch.rewards.clone();
            rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
            rewards.dedup();
            assert_eq!(rewards.len(), *batch_size);
            assert!(rewards.iter().all(|r| *r >= 0.0 && *r < 50.0));
        }
        Ok(())
    }

    #[test]
    fn test_sample_all_of_three() -> Result<()> {
        let mut mem = memory(5);
        for r in [1f32, 2.0, 3.0].iter() {
            mem.push(transition(*r))?;
        }
        let batch = mem.sample(3)?;
        let mut rewards = batch.rewards;
        rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(rewards, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_batch_fields_stay_aligned() -> Result<()> {
        let mut mem = memory(10);
        for i in 0..10 {
            let mut tr = transition(i as f32);
            tr.action = i;
            tr.is_terminated = i % 2 == 0;
            mem.push(tr)?;
        }
        let (states, actions, rewards, next_states, is_terminated) = mem.sample(10)?.unpack();
        for i in 0..10 {
            assert_eq!(states[i].0, rewards[i]);
            assert_eq!(next_states[i].0, rewards[i] + 1.0);
            assert_eq!(actions[i] as f32, rewards[i]);
            assert_eq!(is_terminated[i], actions[i] % 2 == 0);
        }
        Ok(())
    }

    #[test]
    fn test_insufficient_samples() -> Result<()> {
        let mut mem = memory(5);
        mem.push(transition(1.0))?;
        let err = mem.sample(2).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ArcadeError>(),
            Some(&ArcadeError::InsufficientSamples {
                requested: 2,
                available: 1
            })
        );
        Ok(())
    }
}
