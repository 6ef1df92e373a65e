//! DQN agent.
use super::DqnConfig;
use crate::{
    error::ArcadeError,
    record::{Record, RecordValue},
    replay_memory::TransitionBatch,
    Agent, Env, Policy, ReplayBufferBase, ValueNetwork,
};
use anyhow::{Context, Result};
use log::trace;
use std::{marker::PhantomData, path::Path};

/// Returns the index of the largest value.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if *v <= b => {}
            _ => best = Some((i, *v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Computes `y = r + gamma * max_a' Q_tgt(s', a') * (1 - terminal)`.
///
/// Only `is_terminated` masks the bootstrapped value. A transition cut off
/// by a time limit is not terminal and keeps bootstrapping.
pub fn bellman_targets(
    rewards: &[f32],
    next_max_q: &[f32],
    is_terminated: &[bool],
    gamma: f32,
) -> Vec<f32> {
    rewards
        .iter()
        .zip(next_max_q.iter())
        .zip(is_terminated.iter())
        .map(|((r, q), t)| if *t { *r } else { r + gamma * q })
        .collect()
}

/// Vanilla DQN agent.
///
/// `qnet` is trained by gradient steps; `qnet_tgt` only changes when
/// [`Agent::sync_target`] copies all parameters of `qnet` into it.
pub struct Dqn<E, Q>
where
    E: Env,
    Q: ValueNetwork<E::Obs>,
{
    qnet: Q,
    qnet_tgt: Q,
    discount_factor: f32,
    batch_size: usize,
    n_opts: usize,
    n_syncs: usize,
    phantom: PhantomData<E>,
}

impl<E, Q> Dqn<E, Q>
where
    E: Env,
    Q: ValueNetwork<E::Obs>,
{
    /// Constructs the agent from two networks of the same architecture.
    ///
    /// The parameters of `qnet` are copied into `qnet_tgt` immediately.
    pub fn build(config: &DqnConfig, qnet: Q, mut qnet_tgt: Q) -> Result<Self> {
        if qnet.n_actions() == 0 || qnet.n_actions() != qnet_tgt.n_actions() {
            return Err(ArcadeError::InvalidConfig(format!(
                "networks must have the same, non-zero number of actions ({} and {})",
                qnet.n_actions(),
                qnet_tgt.n_actions()
            ))
            .into());
        }
        if config.batch_size == 0 {
            return Err(ArcadeError::InvalidConfig("batch_size must be positive".into()).into());
        }
        qnet_tgt.copy_parameters_from(&qnet)?;

        Ok(Self {
            qnet,
            qnet_tgt,
            discount_factor: config.discount_factor,
            batch_size: config.batch_size,
            n_opts: 0,
            n_syncs: 0,
            phantom: PhantomData,
        })
    }

    /// The trained network.
    pub fn qnet(&self) -> &Q {
        &self.qnet
    }

    /// The target network.
    pub fn qnet_tgt(&self) -> &Q {
        &self.qnet_tgt
    }

    /// The number of optimization steps performed so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// The number of target synchronizations performed so far.
    pub fn n_syncs(&self) -> usize {
        self.n_syncs
    }

    fn update_critic(&mut self, batch: TransitionBatch<E::Obs>) -> Result<f32> {
        let (states, actions, rewards, next_states, is_terminated) = batch.unpack();
        let next_max_q = self
            .qnet_tgt
            .forward(&next_states)?
            .iter()
            .map(|q| q.iter().cloned().fold(f32::NEG_INFINITY, f32::max))
            .collect::<Vec<_>>();
        let targets = bellman_targets(&rewards, &next_max_q, &is_terminated, self.discount_factor);
        self.qnet.fit(&states, &actions, &targets)
    }
}

impl<E, Q> Policy<E> for Dqn<E, Q>
where
    E: Env,
    Q: ValueNetwork<E::Obs>,
{
    fn act(&self, obs: &E::Obs) -> Result<usize> {
        let q = self.qnet.forward(std::slice::from_ref(obs))?;
        let row = q.first().context("value network returned no rows")?;
        argmax(row).context("value network returned no action values")
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q>
where
    E: Env,
    Q: ValueNetwork<E::Obs>,
    R: ReplayBufferBase<Batch = TransitionBatch<E::Obs>>,
{
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn opt(&mut self, buffer: &mut R) -> Result<Record> {
        let batch = buffer.batch(self.batch_size)?;
        let loss = self.update_critic(batch)?;
        self.n_opts += 1;
        trace!("opt {}: loss = {}", self.n_opts, loss);
        Ok(Record::from_slice(&[("loss", RecordValue::Scalar(loss))]))
    }

    fn sync_target(&mut self) -> Result<()> {
        self.qnet_tgt.copy_parameters_from(&self.qnet)?;
        self.n_syncs += 1;
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        self.qnet.save(path)
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path)?;
        self.qnet_tgt.copy_parameters_from(&self.qnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{DummyEnv, DummyObs, DummyQNet},
        replay_memory::{ReplayMemory, ReplayMemoryConfig, Transition},
        ExperienceBufferBase,
    };
    use tempdir::TempDir;

    type Agent_ = Dqn<DummyEnv, DummyQNet>;

    fn agent(batch_size: usize) -> Result<Agent_> {
        Dqn::build(
            &DqnConfig::default().batch_size(batch_size),
            DummyQNet::new(vec![0.5, 2.0, 1.0]),
            DummyQNet::new(vec![0.0, 0.0, 0.0]),
        )
    }

    #[test]
    fn test_argmax_first_of_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, -1.0]), Some(1));
        assert_eq!(argmax(&[-2.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_bellman_targets_mask_terminal_only() {
        let y = bellman_targets(&[1.0, 1.0, -1.0], &[2.0, 2.0, 4.0], &[false, true, false], 0.5);
        assert_eq!(y, vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_build_copies_params_to_target() -> Result<()> {
        let agent = agent(1)?;
        assert_eq!(agent.qnet_tgt().params, agent.qnet().params);
        Ok(())
    }

    #[test]
    fn test_build_rejects_mismatched_networks() {
        let res: Result<Agent_> = Dqn::build(
            &DqnConfig::default(),
            DummyQNet::new(vec![0.0, 1.0]),
            DummyQNet::new(vec![0.0]),
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_greedy_action() -> Result<()> {
        let agent = agent(1)?;
        assert_eq!(agent.act(&DummyObs(0.0))?, 1);
        Ok(())
    }

    #[test]
    fn test_opt_uses_target_network() -> Result<()> {
        let mut agent = agent(1)?;
        let mut buffer = ReplayMemory::new(&ReplayMemoryConfig::default());
        buffer.push(Transition {
            state: DummyObs(0.0),
            action: 0,
            reward: 1.0,
            next_state: DummyObs(1.0),
            is_terminated: false,
        })?;

        // Target is 1.0 + 0.99 * max(0.5, 2.0, 1.0) computed from the target copy.
        let record = Agent::<DummyEnv, ReplayMemory<DummyObs>>::opt(&mut agent, &mut buffer)?;
        let y = 1.0 + 0.99 * 2.0;
        assert!((record.get_scalar("loss")? - (y - 0.5)).abs() < 1e-6);
        assert_eq!(agent.qnet().n_fits, 1);
        assert_eq!(agent.qnet_tgt().n_fits, 0);
        assert_eq!(agent.qnet_tgt().params, vec![0.5, 2.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_opt_fails_on_small_memory() -> Result<()> {
        let mut agent = agent(4)?;
        let mut buffer = ReplayMemory::<DummyObs>::new(&ReplayMemoryConfig::default());
        let err = Agent::<DummyEnv, _>::opt(&mut agent, &mut buffer).unwrap_err();
        assert!(err.downcast_ref::<ArcadeError>().is_some());
        Ok(())
    }

    #[test]
    fn test_save_load_params() -> Result<()> {
        let dir = TempDir::new("dqn_params")?;
        let path = dir.path().join("qnet");
        let agent1 = agent(1)?;
        Agent::<DummyEnv, ReplayMemory<DummyObs>>::save_params(&agent1, &path)?;

        let mut agent2: Agent_ = Dqn::build(
            &DqnConfig::default(),
            DummyQNet::new(vec![0.0; 3]),
            DummyQNet::new(vec![0.0; 3]),
        )?;
        Agent::<DummyEnv, ReplayMemory<DummyObs>>::load_params(&mut agent2, &path)?;
        assert_eq!(agent2.qnet().params, vec![0.5, 2.0, 1.0]);
        assert_eq!(agent2.qnet_tgt().params, vec![0.5, 2.0, 1.0]);
        Ok(())
    }
}
