//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy};
use anyhow::Result;
use log::info;

/// Runs a fixed number of greedy episodes.
///
/// An episode ends when the environment reports termination or truncation.
///
/// # Examples
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::new(env, 5);
/// let rewards = evaluator.evaluate(&agent)?;
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    pub fn new(env: E, n_episodes: usize) -> Self {
        Self { n_episodes, env }
    }

    /// The environment used for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &P) -> Result<Vec<f32>> {
        let mut rewards = Vec::with_capacity(self.n_episodes);

        for ix in 0..self.n_episodes {
            let mut obs = self.env.reset()?;
            let mut r_total = 0f32;

            loop {
                let act = policy.act(&obs)?;
                let step = self.env.step(act)?;
                r_total += step.reward;
                if step.is_done() {
                    break;
                }
                obs = step.obs;
            }

            info!("Episode {}: Reward = {}", ix + 1, r_total);
            rewards.push(r_total);
        }

        Ok(rewards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dqn::{Dqn, DqnConfig},
        dummy::{DummyEnv, DummyObs, DummyQNet},
    };

    struct FixedPolicy(usize);

    impl Policy<DummyEnv> for FixedPolicy {
        fn act(&self, _obs: &DummyObs) -> Result<usize> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_episode_rewards() -> Result<()> {
        let mut env = DummyEnv::new(4);
        env.reward = 0.5;
        let mut evaluator = DefaultEvaluator::new(env, 3);
        let rewards = evaluator.evaluate(&FixedPolicy(0))?;
        assert_eq!(rewards, vec![2.0, 2.0, 2.0]);
        assert_eq!(evaluator.env().n_resets, 3);
        assert_eq!(evaluator.env().n_steps, 12);
        Ok(())
    }

    #[test]
    fn test_truncation_ends_episode() -> Result<()> {
        let mut env = DummyEnv::new(100);
        env.truncate_at = Some(3);
        let mut evaluator = DefaultEvaluator::new(env, 2);
        let rewards = evaluator.evaluate(&FixedPolicy(1))?;
        assert_eq!(rewards, vec![3.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_agent_is_not_modified() -> Result<()> {
        let agent: Dqn<DummyEnv, DummyQNet> = Dqn::build(
            &DqnConfig::default(),
            DummyQNet::new(vec![0.1, 0.3, 0.2]),
            DummyQNet::new(vec![0.0; 3]),
        )?;
        let mut evaluator = DefaultEvaluator::new(DummyEnv::new(5), 2);
        evaluator.evaluate(&agent)?;
        assert_eq!(agent.qnet().params, vec![0.1, 0.3, 0.2]);
        assert_eq!(agent.qnet().n_fits, 0);
        Ok(())
    }
}
