use super::CnnConfig;
use crate::model::SubModel1;
use anyhow::{bail, Result};
use candle_core::{Device, Tensor};
use candle_nn::{
    conv::Conv2dConfig,
    conv2d, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};

// (kernel, stride, output channels) of the convolutional layers.
const CONV_LAYERS: [(usize, usize, usize); 3] = [(8, 4, 32), (4, 2, 64), (3, 1, 64)];

/// Convolutional neural network, which has the same architecture of the DQN paper.
///
/// Takes a batch of stacked frames of shape `(batch, n_stack, height, width)`
/// and outputs action values of shape `(batch, out_dim)`.
pub struct Cnn {
    device: Device,
    seq: Sequential,
}

impl Cnn {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    /// The number of features after the last convolutional layer.
    ///
    /// Fails if the input is too small for the kernels.
    pub fn flat_dim(config: &CnnConfig) -> Result<usize> {
        let (mut h, mut w) = (config.in_height, config.in_width);
        let mut c = config.n_stack;
        for &(k, s, out) in CONV_LAYERS.iter() {
            if h < k || w < k {
                bail!(
                    "input of {}x{} is too small for the convolutional layers",
                    config.in_height,
                    config.in_width
                );
            }
            h = (h - k) / s + 1;
            w = (w - k) / s + 1;
            c = out;
        }
        Ok(c * h * w)
    }

    fn create_net(vb: &VarBuilder, config: &CnnConfig) -> Result<Sequential> {
        let flat_dim = Self::flat_dim(config)?;
        let [(k1, s1, c1), (k2, s2, c2), (k3, s3, c3)] = CONV_LAYERS;

        let seq = seq()
            .add(conv2d(config.n_stack, c1, k1, Self::stride(s1), vb.pp("c1"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(c1, c2, k2, Self::stride(s2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(c2, c3, k3, Self::stride(s3), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu()?.flatten_from(1))
            .add(linear(flat_dim, config.hidden_dim, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu())
            .add(linear(config.hidden_dim, config.out_dim, vb.pp("l2"))?);

        Ok(seq)
    }
}

impl SubModel1 for Cnn {
    type Config = CnnConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input) -> Result<Tensor> {
        Ok(self.seq.forward(&x.to_device(&self.device)?)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        if config.n_stack == 0 || config.hidden_dim == 0 || config.out_dim == 0 {
            bail!("invalid network configuration: {:?}", config);
        }
        let device = vb.device().clone();
        let seq = Self::create_net(&vb, &config)?;

        Ok(Self { device, seq })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;

    fn build(config: CnnConfig) -> Result<(VarMap, Cnn)> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let cnn = Cnn::build(vb, config)?;
        Ok((varmap, cnn))
    }

    #[test]
    fn test_flat_dim() -> Result<()> {
        assert_eq!(Cnn::flat_dim(&CnnConfig::default())?, 3136);
        assert_eq!(Cnn::flat_dim(&CnnConfig::default().in_size(36, 36))?, 64);
        assert!(Cnn::flat_dim(&CnnConfig::default().in_size(20, 84)).is_err());
        Ok(())
    }

    #[test]
    fn test_forward_shape() -> Result<()> {
        let (varmap, cnn) = build(CnnConfig::new(6))?;
        // 3 conv layers and 2 linear layers, weight and bias each.
        assert_eq!(varmap.all_vars().len(), 10);

        let x = Tensor::zeros((2, 4, 84, 84), DType::F32, &Device::Cpu)?;
        assert_eq!(cnn.forward(&x)?.dims(), &[2, 6]);
        Ok(())
    }

    #[test]
    fn test_small_input() -> Result<()> {
        let config = CnnConfig::new(3).in_size(36, 36).hidden_dim(16).n_stack(2);
        let (_, cnn) = build(config)?;
        let x = Tensor::ones((5, 2, 36, 36), DType::F32, &Device::Cpu)?;
        assert_eq!(cnn.forward(&x)?.dims(), &[5, 3]);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(build(CnnConfig::new(0)).is_err());
        assert!(build(CnnConfig::new(6).in_size(7, 7)).is_err());
    }
}
