//! Utilities.
use anyhow::{bail, Result};
use arcade_core::Obs;
use candle_core::{DType, Device, Tensor};
mod named_tensors;
pub use named_tensors::NamedTensors;
use std::convert::TryFrom;

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: usize);
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor, candle_core::Error> {
    let device = x.device();
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?.to_device(device)?;
    let m2 = Tensor::try_from(1f32)?
        .to_device(device)?
        .broadcast_sub(&m1)?;
    (((0.5 * m1)? * d.powf(2.0))? + m2 * (d - 0.5))?.mean_all()
}

/// Stacks observations into a tensor with a leading batch dimension.
pub fn obs_to_tensor<O: Obs>(obs: &[O], device: &Device) -> Result<Tensor> {
    let shape = match obs.first() {
        None => bail!("empty batch of observations"),
        Some(o) => o.shape(),
    };
    let mut buf = Vec::with_capacity(obs.len() * shape.iter().product::<usize>());
    for o in obs.iter() {
        if o.shape() != shape {
            bail!("observations of shapes {:?} and {:?} in a batch", shape, o.shape());
        }
        o.extend_flat(&mut buf);
    }

    let mut dims = vec![obs.len()];
    dims.extend(shape);
    Ok(Tensor::from_vec(buf, dims, device)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct VecObs(Vec<f32>);

    impl Obs for VecObs {
        fn shape(&self) -> Vec<usize> {
            vec![self.0.len()]
        }

        fn extend_flat(&self, buf: &mut Vec<f32>) {
            buf.extend_from_slice(&self.0);
        }
    }

    #[test]
    fn test_smooth_l1_loss() -> Result<()> {
        let x = Tensor::from_slice(&[0.0f32, 0.5, 3.0], (3,), &Device::Cpu)?;
        let y = Tensor::zeros((3,), DType::F32, &Device::Cpu)?;
        // (0 + 0.125 + 2.5) / 3
        let loss = smooth_l1_loss(&x, &y)?.to_scalar::<f32>()?;
        assert!((loss - 2.625 / 3.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_obs_to_tensor() -> Result<()> {
        let obs = vec![VecObs(vec![1.0, 2.0]), VecObs(vec![3.0, 4.0])];
        let t = obs_to_tensor(&obs, &Device::Cpu)?;
        assert_eq!(t.dims(), &[2, 2]);
        assert_eq!(t.to_vec2::<f32>()?, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        assert!(obs_to_tensor::<VecObs>(&[], &Device::Cpu).is_err());
        let ragged = vec![VecObs(vec![1.0]), VecObs(vec![1.0, 2.0])];
        assert!(obs_to_tensor(&ragged, &Device::Cpu).is_err());
        Ok(())
    }
}
