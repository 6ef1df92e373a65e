//! Configuration of [`Trainer`](super::Trainer).
use crate::{error::ArcadeError, explorer::EpsilonGreedy};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// Training stops when this number of environment steps is reached.
    pub max_frames: usize,

    /// Learning starts once the memory holds more than this number of transitions.
    pub min_memory_for_train: usize,

    /// Interval of hard target updates in environment steps.
    pub target_update_freq: usize,

    /// Interval of saving checkpoints in environment steps. `0` disables checkpoints.
    pub save_every: usize,

    /// Directory under which the run directory is created. `None` disables checkpoints.
    pub model_dir: Option<String>,

    /// Name of the run directory.
    pub run_name: String,

    /// File name prefix of checkpoints.
    pub checkpoint_prefix: String,

    /// Exploration schedule.
    pub explorer: EpsilonGreedy,

    /// Seed of the random number generator for exploration.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_frames: 50_000,
            min_memory_for_train: 2_000,
            target_update_freq: 5_000,
            save_every: 10_000,
            model_dir: Some("./model".to_string()),
            run_name: "dqn_pong".to_string(),
            checkpoint_prefix: "dqn_pong".to_string(),
            explorer: EpsilonGreedy::default(),
            seed: 42,
        }
    }
}

impl TrainerConfig {
    /// Sets the frame budget.
    pub fn max_frames(mut self, v: usize) -> Self {
        self.max_frames = v;
        self
    }

    /// Sets the memory size at which learning starts.
    pub fn min_memory_for_train(mut self, v: usize) -> Self {
        self.min_memory_for_train = v;
        self
    }

    /// Sets the interval of target updates in environment steps.
    pub fn target_update_freq(mut self, v: usize) -> Self {
        self.target_update_freq = v;
        self
    }

    /// Sets the interval of saving checkpoints in environment steps.
    pub fn save_every(mut self, v: usize) -> Self {
        self.save_every = v;
        self
    }

    /// Sets the directory where checkpoints are saved.
    pub fn model_dir(mut self, v: Option<impl Into<String>>) -> Self {
        self.model_dir = v.map(|v| v.into());
        self
    }

    /// Sets the name of the run.
    pub fn run_name(mut self, v: impl Into<String>) -> Self {
        self.run_name = v.into();
        self
    }

    /// Sets the file name prefix of checkpoints.
    pub fn checkpoint_prefix(mut self, v: impl Into<String>) -> Self {
        self.checkpoint_prefix = v.into();
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks that the values are in their valid ranges.
    pub fn validate(&self) -> Result<(), ArcadeError> {
        if self.max_frames == 0 {
            return Err(ArcadeError::InvalidConfig("max_frames must be positive".into()));
        }
        if self.target_update_freq == 0 {
            return Err(ArcadeError::InvalidConfig(
                "target_update_freq must be positive".into(),
            ));
        }
        let e = &self.explorer;
        if e.eps_start < e.eps_final || e.eps_final < 0.0 || e.eps_start > 1.0 {
            return Err(ArcadeError::InvalidConfig(format!(
                "epsilon must decay within [0, 1], got {} -> {}",
                e.eps_start, e.eps_final
            )));
        }
        Ok(())
    }

    /// Checks that the first learning step finds at least `batch_size` transitions.
    pub fn validate_batch_size(&self, batch_size: usize) -> Result<(), ArcadeError> {
        if self.min_memory_for_train + 1 < batch_size {
            return Err(ArcadeError::InvalidConfig(format!(
                "min_memory_for_train ({}) must be at least batch_size - 1 ({})",
                self.min_memory_for_train,
                batch_size - 1
            )));
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .max_frames(100)
            .target_update_freq(10)
            .model_dir(Some("some/directory"))
            .explorer(EpsilonGreedy::with_final_step(50));

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(TrainerConfig::default().validate().is_ok());
        assert!(TrainerConfig::default().target_update_freq(0).validate().is_err());
        assert!(TrainerConfig::default().max_frames(0).validate().is_err());
        let rising = EpsilonGreedy::default().eps_start(0.1).eps_final(0.5);
        assert!(TrainerConfig::default().explorer(rising).validate().is_err());
    }

    #[test]
    fn test_validate_batch_size() {
        let config = TrainerConfig::default().min_memory_for_train(8);
        assert!(config.validate_batch_size(1).is_ok());
        assert!(config.validate_batch_size(9).is_ok());
        assert!(matches!(
            config.validate_batch_size(16),
            Err(ArcadeError::InvalidConfig(_))
        ));
        assert!(TrainerConfig::default().min_memory_for_train(0).validate_batch_size(1).is_ok());
    }
}
