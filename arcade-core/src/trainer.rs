//! Train [`Agent`].
mod config;
mod context;
use crate::{
    record::{Record, RecordValue, Recorder},
    replay_memory::Transition,
    Agent, Env, ExperienceBufferBase, ReplayBufferBase,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
pub use context::{TrainerState, TrainingContext};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// Every call of [`Trainer::train_step`] performs exactly one environment step:
///
/// 1. Select an action: with probability `epsilon(frame_idx)` a uniformly random
///    action, otherwise the greedy action of the agent.
/// 2. Step the environment and push the transition into the replay memory.
/// 3. Add the reward to the episode reward and increment `frame_idx`.
/// 4. If the memory holds more than `min_memory_for_train` transitions, switch to
///    [`TrainerState::Learning`]. In that state, perform one optimization step.
/// 5. If `frame_idx % target_update_freq == 0`, copy the trained network into the
///    target network.
/// 6. If the episode terminated or was truncated, log and record its reward,
///    then reset the environment.
/// 7. If `frame_idx % save_every == 0`, save a checkpoint
///    `(model_dir)/(run_name)/(checkpoint_prefix)_(frame_idx / 1000)k`.
/// 8. If `frame_idx >= max_frames`, switch to [`TrainerState::Done`].
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Collecting
///     Collecting --> Collecting: len(memory) <= min_memory_for_train
///     Collecting --> Learning: len(memory) > min_memory_for_train
///     Learning --> Learning: one optimization step per frame
///     Collecting --> Done: frame_idx >= max_frames
///     Learning --> Done: frame_idx >= max_frames
///     Done --> [*]
/// ```
///
/// A failure to save a checkpoint is logged and training continues. Any other
/// error, from the environment or the agent, aborts training.
pub struct Trainer {
    config: TrainerConfig,
    rng: StdRng,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    /// The configuration of the trainer.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Path of the checkpoint written at the given frame, if checkpoints are enabled.
    pub fn checkpoint_path(&self, frame_idx: usize) -> Option<PathBuf> {
        self.config.model_dir.as_ref().map(|dir| {
            Path::new(dir).join(&self.config.run_name).join(format!(
                "{}_{}k",
                self.config.checkpoint_prefix,
                frame_idx / 1000
            ))
        })
    }

    fn save_model<E, A, R>(agent: &A, path: &Path) -> Result<()>
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        agent.save_params(path)
    }

    fn select_action<E, A, R>(&mut self, frame_idx: usize, obs: &E::Obs, env: &mut E, agent: &A) -> Result<usize>
    where
        E: Env,
        A: Agent<E, R>,
        R: ReplayBufferBase,
    {
        let eps = self.config.explorer.epsilon(frame_idx);
        if self.rng.gen::<f64>() < eps {
            Ok(env.sample_action())
        } else {
            agent.act(obs)
        }
    }

    fn episode_record<O>(&self, ctx: &TrainingContext<O>, memory_len: usize) -> Record {
        let mut record = Record::from_slice(&[
            ("frame_idx", RecordValue::Scalar(ctx.frame_idx as f32)),
            ("episode", RecordValue::Scalar(ctx.episodes as f32)),
            ("episode_reward", RecordValue::Scalar(ctx.episode_reward)),
            (
                "epsilon",
                RecordValue::Scalar(self.config.explorer.epsilon(ctx.frame_idx) as f32),
            ),
            ("memory_len", RecordValue::Scalar(memory_len as f32)),
            ("time", RecordValue::DateTime(Local::now())),
        ]);
        if !ctx.episode_losses.is_empty() {
            let loss = ctx.episode_losses.iter().sum::<f32>() / ctx.episode_losses.len() as f32;
            record.insert("loss", RecordValue::Scalar(loss));
        }
        record
    }

    /// Performs a single environment step and everything scheduled after it.
    ///
    /// Returns the state of the trainer after the step. Calling this method in
    /// [`TrainerState::Done`] does nothing.
    pub fn train_step<E, A, R, D>(
        &mut self,
        ctx: &mut TrainingContext<E::Obs>,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut D,
    ) -> Result<TrainerState>
    where
        E: Env,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = Transition<E::Obs>> + ReplayBufferBase,
        D: Recorder,
    {
        if ctx.state == TrainerState::Done {
            return Ok(TrainerState::Done);
        }

        let state = match ctx.obs.take() {
            Some(obs) => obs,
            None => env.reset()?,
        };

        // Environment step
        let act = self.select_action::<E, A, R>(ctx.frame_idx, &state, env, agent)?;
        let step = env.step(act)?;
        buffer.push(Transition {
            state,
            action: act,
            reward: step.reward,
            next_state: step.obs.clone(),
            is_terminated: step.is_terminated,
        })?;
        ctx.episode_reward += step.reward;
        ctx.frame_idx += 1;

        // Optimization step
        if ctx.state == TrainerState::Collecting && buffer.len() > self.config.min_memory_for_train {
            info!(
                "Start learning at frame {} with {} transitions in memory.",
                ctx.frame_idx,
                buffer.len()
            );
            ctx.state = TrainerState::Learning;
        }
        if ctx.state == TrainerState::Learning {
            let record = agent.opt(buffer)?;
            ctx.n_opts += 1;
            if let Ok(loss) = record.get_scalar("loss") {
                ctx.episode_losses.push(loss);
            }
        }

        if ctx.frame_idx % self.config.target_update_freq == 0 {
            agent.sync_target()?;
            debug!("Synchronized the target network at frame {}.", ctx.frame_idx);
        }

        // End of episode
        if step.is_done() {
            info!(
                "Frame: {:7} | Episode reward: {:5.1} | Eps: {:.3}",
                ctx.frame_idx,
                ctx.episode_reward,
                self.config.explorer.epsilon(ctx.frame_idx)
            );
            ctx.episodes += 1;
            recorder.write(self.episode_record(ctx, buffer.len()));
            ctx.rewards_history.push(ctx.episode_reward);
            ctx.episode_reward = 0.0;
            ctx.episode_losses.clear();
            ctx.obs = Some(env.reset()?);
        } else {
            ctx.obs = Some(step.obs);
        }

        // Checkpoint
        if self.config.save_every > 0 && ctx.frame_idx % self.config.save_every == 0 {
            if let Some(path) = self.checkpoint_path(ctx.frame_idx) {
                match Self::save_model::<E, A, R>(agent, &path) {
                    Ok(()) => info!("Saved the model in {:?}.", &path),
                    Err(e) => warn!("Failed to save model in {:?}: {}", &path, e),
                }
            }
        }

        if ctx.frame_idx >= self.config.max_frames {
            ctx.state = TrainerState::Done;
        }

        Ok(ctx.state)
    }

    /// Runs the training loop until the frame budget is exhausted.
    ///
    /// Returns the context, holding the rewards of all completed episodes.
    /// Fails before the first step if the memory cannot hold a full batch when
    /// learning starts.
    pub fn train<E, A, R, D>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut D,
    ) -> Result<TrainingContext<E::Obs>>
    where
        E: Env,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = Transition<E::Obs>> + ReplayBufferBase,
        D: Recorder,
    {
        self.config.validate_batch_size(agent.batch_size())?;
        let mut ctx = TrainingContext::new();
        while self.train_step(&mut ctx, env, agent, buffer, recorder)? != TrainerState::Done {}
        recorder.flush();
        info!(
            "Finished training: {} frames, {} episodes, {} optimization steps.",
            ctx.frame_idx, ctx.episodes, ctx.n_opts
        );
        Ok(ctx)
    }
}
