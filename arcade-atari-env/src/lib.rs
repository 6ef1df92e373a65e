//! Atari environment for value-based agents on pixel observations.
//!
//! Raw RGB screens are converted to grayscale, cropped to the playfield,
//! resized by area averaging and scaled into `[0, 1]` by [`FrameProcessor`].
//! [`ObservationStacker`] keeps the last K processed frames, and [`AtariEnv`]
//! repeats every action for a fixed number of simulator frames.
//!
//! The game itself is provided by a [`Simulator`]. With feature `ale`, the
//! Arcade Learning Environment is available as `AleSimulator`. ROM images are
//! loaded from the directory given by environment variable `ATARI_ROM_DIR`.
//! An easy way to obtain them is [AutoROM](https://pypi.org/project/AutoROM/).
//!
//! ```bash
//! pip install autorom
//! mkdir $HOME/atari_rom
//! AutoROM --install-dir $HOME/atari_rom
//! export ATARI_ROM_DIR=$HOME/atari_rom
//! ```
//!
//! Here is an example of running an environment with random actions.
//!
//! ```no_run
//! use anyhow::Result;
//! use arcade_atari_env::{util::test::ScriptedSimulator, AtariEnv, AtariEnvConfig};
//! use arcade_core::Env as _;
//!
//! fn main() -> Result<()> {
//!     let sim = ScriptedSimulator::new(6, 1000);
//!     let mut env = AtariEnv::new(sim, &AtariEnvConfig::default())?;
//!     let _obs = env.reset()?;
//!
//!     loop {
//!         let act = env.sample_action();
//!         let step = env.step(act)?;
//!         if step.is_done() {
//!             break;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]
#[cfg(feature = "ale")]
mod ale;
mod env;
mod error;
mod frame;
mod obs;
mod simulator;
mod stacker;
pub mod util;
#[cfg(feature = "ale")]
pub use ale::{AleConfig, AleSimulator};
pub use env::{AtariEnv, AtariEnvConfig};
pub use error::AtariEnvError;
pub use frame::{resize_area, FrameProcessor, FrameProcessorConfig, RawFrame};
pub use obs::StackedFrames;
pub use simulator::{DiscreteActionSpace, SimStep, Simulator};
pub use stacker::ObservationStacker;
