use anyhow::Result;
use arcade_atari_env::{AleConfig, AleSimulator, AtariEnv, AtariEnvConfig, StackedFrames};
use arcade_candle_agent::{
    cnn::{Cnn, CnnConfig},
    dqn::{DqnModel, DqnModelConfig},
    opt::OptimizerConfig,
    Device,
};
use arcade_core::{
    dqn::{Dqn as Dqn_, DqnConfig},
    record::CsvRecorder,
    replay_memory::{ReplayMemory, ReplayMemoryConfig},
    DefaultEvaluator, Env as _, Evaluator as _, Trainer, TrainerConfig,
};
use chrono::Utc;
use clap::{ArgGroup, Parser};
use log::info;
use std::{convert::TryFrom, fs, path::Path};

type Env = AtariEnv<AleSimulator>;
type ReplayBuffer = ReplayMemory<StackedFrames>;
type Dqn = Dqn_<Env, DqnModel<Cnn>>;

const REWARD_COLUMNS: [&str; 6] = [
    "frame_idx",
    "episode",
    "episode_reward",
    "epsilon",
    "memory_len",
    "loss",
];

/// Train a DQN agent on Pong, or play with a trained model.
#[derive(Parser, Debug)]
#[command(version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["train", "play"])))]
struct Args {
    /// Train the agent
    #[arg(long, default_value_t = false)]
    train: bool,

    /// Play with the model saved at the given path
    #[arg(long, value_name = "MODEL")]
    play: Option<String>,

    /// The number of episodes to play
    #[arg(long, default_value_t = 5)]
    episodes: usize,

    /// YAML file of the trainer configuration
    #[arg(long)]
    config: Option<String>,
}

mod config {
    use super::*;

    /// The emulator takes an `i32` seed.
    pub fn ale_seed(seed: u64) -> Result<i32> {
        Ok(i32::try_from(seed)?)
    }

    pub fn env(seed: i32) -> Result<Env> {
        let sim = AleSimulator::new(&AleConfig::default().random_seed(seed))?;
        AtariEnv::new(sim, &AtariEnvConfig::default())
    }

    pub fn model_config(n_actions: usize) -> DqnModelConfig<CnnConfig> {
        DqnModelConfig::default()
            .q_config(CnnConfig::new(n_actions))
            .opt_config(OptimizerConfig::Adam {
                lr: 1e-4,
                eps: 1e-4,
            })
    }

    pub fn trainer_config(path: &Option<String>) -> Result<TrainerConfig> {
        match path {
            Some(path) => TrainerConfig::load(path),
            None => Ok(TrainerConfig::default()),
        }
    }

    pub fn device() -> Result<candle_core::Device> {
        let device = Device::cuda_if_available();
        info!("Device: {:?}", device);
        Ok(candle_core::Device::try_from(device)?)
    }
}

fn build_agent(n_actions: usize) -> Result<Dqn> {
    let device = config::device()?;
    let model_config = config::model_config(n_actions);
    let qnet = DqnModel::build(model_config.clone(), device.clone())?;
    let qnet_tgt = DqnModel::build(model_config, device)?;
    Dqn::build(&DqnConfig::default(), qnet, qnet_tgt)
}

fn train(args: &Args) -> Result<()> {
    let run_name = format!("dqn_pong_{}", Utc::now().timestamp());
    let trainer_config = config::trainer_config(&args.config)?.run_name(&run_name);
    let run_dir = Path::new(trainer_config.model_dir.as_deref().unwrap_or(".")).join(&run_name);
    fs::create_dir_all(&run_dir)?;
    trainer_config.save(run_dir.join("trainer.yaml"))?;

    let mut env = config::env(config::ale_seed(trainer_config.seed)?)?;
    let mut agent = build_agent(env.n_actions())?;
    let mut buffer = ReplayBuffer::new(&ReplayMemoryConfig::default());
    let mut recorder = CsvRecorder::new(run_dir.join("rewards.csv"), &REWARD_COLUMNS)?;
    let mut trainer = Trainer::build(trainer_config)?;

    info!("Start training {}.", run_name);
    let ctx = trainer.train(&mut env, &mut agent, &mut buffer, &mut recorder)?;
    let n = ctx.rewards_history.len().min(10);
    if n > 0 {
        let recent = &ctx.rewards_history[ctx.rewards_history.len() - n..];
        info!(
            "Mean reward of the last {} episodes: {:.1}",
            n,
            recent.iter().sum::<f32>() / n as f32
        );
    }

    Ok(())
}

fn play(model: &str, n_episodes: usize) -> Result<()> {
    let env = config::env(0)?;
    let mut agent = build_agent(env.n_actions())?;
    arcade_core::Agent::<Env, ReplayBuffer>::load_params(&mut agent, Path::new(model))?;

    let mut evaluator = DefaultEvaluator::new(env, n_episodes);
    let rewards = evaluator.evaluate(&agent)?;
    if !rewards.is_empty() {
        info!(
            "Mean reward: {:.1}",
            rewards.iter().sum::<f32>() / rewards.len() as f32
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match &args.play {
        Some(model) => play(model, args.episodes),
        None => train(&args),
    }
}
