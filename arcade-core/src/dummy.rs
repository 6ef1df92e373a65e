//! Test doubles used in unit tests of this crate.
use crate::{Env, Obs, Step, ValueNetwork};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Dummy observation holding a single value.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyObs(pub f32);

impl Obs for DummyObs {
    fn shape(&self) -> Vec<usize> {
        vec![1]
    }

    fn extend_flat(&self, buf: &mut Vec<f32>) {
        buf.push(self.0);
    }
}

/// Scripted environment.
///
/// Observations count the steps of the current episode. Each episode ends
/// with `is_terminated` after `episode_len` steps, or earlier with
/// `is_truncated` if `truncate_at` is set.
pub struct DummyEnv {
    pub n_actions: usize,
    pub episode_len: usize,
    pub truncate_at: Option<usize>,
    pub reward: f32,
    pub fail_at_step: Option<usize>,
    pub n_resets: usize,
    pub n_steps: usize,
    t: usize,
}

impl DummyEnv {
    pub fn new(episode_len: usize) -> Self {
        Self {
            n_actions: 3,
            episode_len,
            truncate_at: None,
            reward: 1.0,
            fail_at_step: None,
            n_resets: 0,
            n_steps: 0,
            t: 0,
        }
    }
}

impl Env for DummyEnv {
    type Obs = DummyObs;
    type Info = ();

    fn reset(&mut self) -> Result<DummyObs> {
        self.t = 0;
        self.n_resets += 1;
        Ok(DummyObs(0.0))
    }

    fn step(&mut self, act: usize) -> Result<Step<Self>> {
        self.n_steps += 1;
        if Some(self.n_steps) == self.fail_at_step {
            anyhow::bail!("simulator crashed");
        }
        self.t += 1;
        let is_terminated = self.t >= self.episode_len;
        let is_truncated = !is_terminated && self.truncate_at.map_or(false, |n| self.t >= n);
        Ok(Step::new(
            DummyObs(self.t as f32),
            act,
            self.reward,
            is_terminated,
            is_truncated,
            (),
        ))
    }

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn sample_action(&mut self) -> usize {
        self.n_steps % self.n_actions
    }
}

/// Value network returning the same action values for every observation.
///
/// Each call of `fit` moves the value of the taken actions towards the targets.
pub struct DummyQNet {
    pub params: Vec<f32>,
    pub n_fits: usize,
}

impl DummyQNet {
    pub fn new(params: Vec<f32>) -> Self {
        Self { params, n_fits: 0 }
    }
}

impl ValueNetwork<DummyObs> for DummyQNet {
    type Params = Vec<f32>;

    fn n_actions(&self) -> usize {
        self.params.len()
    }

    fn forward(&self, obs: &[DummyObs]) -> Result<Vec<Vec<f32>>> {
        Ok(obs.iter().map(|_| self.params.clone()).collect())
    }

    fn fit(&mut self, _obs: &[DummyObs], actions: &[usize], targets: &[f32]) -> Result<f32> {
        let mut loss = 0f32;
        for (a, y) in actions.iter().zip(targets.iter()) {
            let d = y - self.params[*a];
            loss += d.abs();
            self.params[*a] += 0.1 * d;
        }
        self.n_fits += 1;
        Ok(loss / actions.len() as f32)
    }

    fn parameters(&self) -> Result<Vec<f32>> {
        Ok(self.params.clone())
    }

    fn load_parameters(&mut self, params: &Vec<f32>) -> Result<()> {
        self.params = params.clone();
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        let s = self
            .params
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        fs::write(path, s)?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let s = fs::read_to_string(path)?;
        self.params = s
            .split_whitespace()
            .map(|p| p.parse::<f32>().context("malformed parameter file"))
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }
}
