//! [`Simulator`] backed by the Arcade Learning Environment.
//!
//! If environment variable `ATARI_ROM_DIR` exists, it is used as the directory
//! from which ROM images are loaded.
use crate::{AtariEnvError, DiscreteActionSpace, RawFrame, SimStep, Simulator};
use anyhow::{Context, Result};
use c_str_macro::c_str;
use log::info;
use serde::{Deserialize, Serialize};
use std::{env, ffi::CString, path::Path};

/// Configuration of [`AleSimulator`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AleConfig {
    /// Directory of ROM images.
    pub rom_dir: String,

    /// Name of the game, the ROM file is `(rom_dir)/(name).bin`.
    pub name: String,

    /// Seed of the emulator.
    pub random_seed: i32,

    /// Probability of repeating the previous action (sticky actions).
    pub repeat_action_probability: f32,

    /// Episodes are truncated after this number of emulator frames.
    pub max_episode_frames: Option<i32>,
}

impl Default for AleConfig {
    fn default() -> Self {
        let rom_dir = env::var("ATARI_ROM_DIR").unwrap_or_default();

        Self {
            rom_dir,
            name: "pong".to_string(),
            random_seed: 42,
            repeat_action_probability: 0.0,
            max_episode_frames: Some(108_000),
        }
    }
}

impl AleConfig {
    /// Sets the name of the game.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the directory of ROM images.
    pub fn rom_dir(mut self, dir: impl Into<String>) -> Self {
        self.rom_dir = dir.into();
        self
    }

    /// Sets the seed of the emulator.
    pub fn random_seed(mut self, seed: i32) -> Self {
        self.random_seed = seed;
        self
    }
}

/// An emulated Atari game with its minimal action set.
///
/// The emulator runs without frame skip; [`AtariEnv`](crate::AtariEnv)
/// repeats actions itself.
pub struct AleSimulator {
    inner: *mut atari_env_sys::ALEInterface,
    actions: Vec<i32>,
    width: u32,
    height: u32,
    max_episode_frames: Option<i32>,
}

unsafe impl Send for AleSimulator {}

impl Drop for AleSimulator {
    fn drop(&mut self) {
        unsafe {
            atari_env_sys::ALE_del(self.inner);
        }
    }
}

impl AleSimulator {
    /// Loads the ROM and starts the emulator.
    pub fn new(config: &AleConfig) -> Result<Self> {
        let rom_path = Path::new(&config.rom_dir).join(format!("{}.bin", config.name));
        if !rom_path.is_file() {
            return Err(AtariEnvError::Simulator(format!("ROM not found: {:?}", rom_path)).into());
        }
        let rom_path = CString::new(rom_path.to_str().context("non UTF-8 ROM path")?)?;

        let ale = unsafe { atari_env_sys::ALE_new() };
        unsafe {
            atari_env_sys::setInt(ale, c_str!("random_seed").as_ptr(), config.random_seed);
            atari_env_sys::setBool(ale, c_str!("display_screen").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("sound").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("color_averaging").as_ptr(), false);
            atari_env_sys::setInt(ale, c_str!("frame_skip").as_ptr(), 1);
            atari_env_sys::setFloat(
                ale,
                c_str!("repeat_action_probability").as_ptr(),
                config.repeat_action_probability,
            );
            atari_env_sys::loadROM(ale, rom_path.as_ptr());
            atari_env_sys::setDifficulty(ale, 0);
            atari_env_sys::reset_game(ale);
        }

        let n = unsafe { atari_env_sys::getMinimalActionSize(ale) } as usize;
        let mut actions = vec![0i32; n];
        unsafe {
            atari_env_sys::getMinimalActionSet(ale, actions.as_mut_ptr());
        }
        let width = unsafe { atari_env_sys::getScreenWidth(ale) } as u32;
        let height = unsafe { atari_env_sys::getScreenHeight(ale) } as u32;
        info!(
            "Loaded {} ({}x{}, {} actions).",
            config.name, height, width, n
        );

        Ok(Self {
            inner: ale,
            actions,
            width,
            height,
            max_episode_frames: config.max_episode_frames,
        })
    }

    fn screen(&self) -> RawFrame {
        let mut buf = vec![0u8; (self.width * self.height * 3) as usize];
        unsafe {
            atari_env_sys::getScreenRGB2(self.inner, buf.as_mut_ptr());
        }
        RawFrame::rgb(self.width, self.height, buf)
    }

    fn episode_frame_number(&self) -> i32 {
        unsafe { atari_env_sys::getEpisodeFrameNumber(self.inner) }
    }
}

impl Simulator for AleSimulator {
    type Info = ();

    fn reset(&mut self) -> Result<(RawFrame, ())> {
        unsafe {
            atari_env_sys::reset_game(self.inner);
        }
        Ok((self.screen(), ()))
    }

    fn step(&mut self, action: usize) -> Result<SimStep<()>> {
        let ale_action = *self
            .actions
            .get(action)
            .ok_or(AtariEnvError::InvalidAction {
                action,
                n_actions: self.actions.len(),
            })?;
        let reward = unsafe { atari_env_sys::act(self.inner, ale_action) } as f32;
        let is_terminated = unsafe { atari_env_sys::game_over(self.inner) };
        let is_truncated = !is_terminated
            && self
                .max_episode_frames
                .map_or(false, |n| self.episode_frame_number() >= n);

        Ok(SimStep {
            frame: self.screen(),
            reward,
            is_terminated,
            is_truncated,
            info: (),
        })
    }

    fn action_space(&self) -> DiscreteActionSpace {
        DiscreteActionSpace {
            n: self.actions.len(),
        }
    }
}
