//! Action-value networks implemented with [candle](https://crates.io/crates/candle-core).
//!
//! [`dqn::DqnModel`] owns the parameters and the optimizer of a network
//! and implements [`arcade_core::ValueNetwork`], so it can be plugged into
//! [`arcade_core::dqn::Dqn`].
#![warn(missing_docs)]
pub mod cnn;
pub mod dqn;
pub mod model;
pub mod opt;
pub mod util;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Device {
    /// The first CUDA device if candle was built with CUDA support, CPU otherwise.
    pub fn cuda_if_available() -> Self {
        if candle_core::utils::cuda_is_available() {
            Self::Cuda(0)
        } else {
            Self::Cpu
        }
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device() -> anyhow::Result<()> {
        let device = candle_core::Device::try_from(Device::Cpu)?;
        assert!(device.is_cpu());

        let s = serde_yaml::to_string(&Device::Cuda(1))?;
        assert_eq!(serde_yaml::from_str::<Device>(&s)?, Device::Cuda(1));
        Ok(())
    }
}
