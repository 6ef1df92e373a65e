//! Frame-skipping environment over a [`Simulator`].
mod config;
use crate::{AtariEnvError, FrameProcessor, ObservationStacker, Simulator, StackedFrames};
use anyhow::Result;
use arcade_core::{Env, Step};
pub use config::AtariEnvConfig;
use log::trace;
use rand::{rngs::StdRng, SeedableRng};

/// Wraps a [`Simulator`] into an [`Env`] with stacked frame observations.
///
/// Each action is repeated for `frame_skip` simulator steps and the rewards
/// are summed. The repetition stops early as soon as the simulator reports
/// termination or truncation. Only the last frame of the window is processed
/// and pushed into the frame stack.
pub struct AtariEnv<S: Simulator> {
    sim: S,
    processor: FrameProcessor,
    stacker: ObservationStacker,
    frame_skip: usize,
    rng: StdRng,
}

impl<S: Simulator> AtariEnv<S> {
    /// Constructs the environment.
    pub fn new(sim: S, config: &AtariEnvConfig) -> Result<Self> {
        if config.frame_skip == 0 {
            return Err(AtariEnvError::InvalidConfig("frame_skip must be positive".into()).into());
        }
        if sim.action_space().n == 0 {
            return Err(AtariEnvError::InvalidConfig("empty action space".into()).into());
        }

        Ok(Self {
            sim,
            processor: FrameProcessor::new(config.processor.clone())?,
            stacker: ObservationStacker::new(config.n_stack)?,
            frame_skip: config.frame_skip,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// The wrapped simulator.
    pub fn simulator(&self) -> &S {
        &self.sim
    }
}

impl<S: Simulator> Env for AtariEnv<S> {
    type Obs = StackedFrames;
    type Info = S::Info;

    fn reset(&mut self) -> Result<StackedFrames> {
        let (frame, _info) = self.sim.reset()?;
        let frame = self.processor.process(&frame)?;
        self.stacker.reset(frame);
        Ok(self.stacker.current_state())
    }

    fn step(&mut self, act: usize) -> Result<Step<Self>> {
        let space = self.sim.action_space();
        if !space.contains(act) {
            return Err(AtariEnvError::InvalidAction {
                action: act,
                n_actions: space.n,
            }
            .into());
        }

        let mut reward = 0f32;
        let mut last = self.sim.step(act)?;
        reward += last.reward;
        for _ in 1..self.frame_skip {
            if last.is_terminated || last.is_truncated {
                break;
            }
            last = self.sim.step(act)?;
            reward += last.reward;
        }
        trace!(
            "act = {}, reward = {}, terminated = {}, truncated = {}",
            act,
            reward,
            last.is_terminated,
            last.is_truncated
        );

        let frame = self.processor.process(&last.frame)?;
        self.stacker.push(frame);

        Ok(Step::new(
            self.stacker.current_state(),
            act,
            reward,
            last.is_terminated,
            last.is_truncated,
            last.info,
        ))
    }

    fn n_actions(&self) -> usize {
        self.sim.action_space().n
    }

    fn sample_action(&mut self) -> usize {
        self.sim.action_space().sample(&mut self.rng)
    }
}
