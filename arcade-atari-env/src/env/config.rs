//! Configuration of [`AtariEnv`](super::AtariEnv).
use crate::FrameProcessorConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configurations of [`AtariEnv`](super::AtariEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AtariEnvConfig {
    /// The number of simulator steps each action is repeated for.
    pub frame_skip: usize,

    /// The number of frames in an observation.
    pub n_stack: usize,

    /// Frame preprocessing.
    pub processor: FrameProcessorConfig,

    /// Seed of the random number generator used for sampling actions.
    pub seed: u64,
}

impl Default for AtariEnvConfig {
    fn default() -> Self {
        Self {
            frame_skip: 4,
            n_stack: 4,
            processor: FrameProcessorConfig::default(),
            seed: 42,
        }
    }
}

impl AtariEnvConfig {
    /// Sets the number of repeated simulator steps per action.
    pub fn frame_skip(mut self, v: usize) -> Self {
        self.frame_skip = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn n_stack(mut self, v: usize) -> Self {
        self.n_stack = v;
        self
    }

    /// Sets the frame preprocessing.
    pub fn processor(mut self, v: FrameProcessorConfig) -> Self {
        self.processor = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`AtariEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AtariEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
