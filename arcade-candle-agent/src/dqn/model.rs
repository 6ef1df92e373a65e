use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::{obs_to_tensor, smooth_l1_loss, NamedTensors, OutDim},
};
use anyhow::{bail, Context, Result};
use arcade_core::{Obs, ValueNetwork};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`DqnModel`].
pub struct DqnModelConfig<Q>
where
    Q: OutDim,
{
    pub(super) q_config: Option<Q>,
    pub(super) opt_config: OptimizerConfig,
}

impl<Q> Default for DqnModelConfig<Q>
where
    Q: OutDim,
{
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<Q> DqnModelConfig<Q>
where
    Q: DeserializeOwned + Serialize + OutDim,
{
    /// Sets configurations for action-value function.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets output dimension of the model.
    pub fn out_dim(mut self, v: usize) -> Self {
        match &mut self.q_config {
            None => {}
            Some(q_config) => q_config.set_out_dim(v),
        };
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`DqnModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value network owning its parameters and optimizer.
///
/// Parameters are saved in the safetensors format.
pub struct DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    device: Device,
    varmap: VarMap,

    // Dimension of the output vector (equal to the number of actions).
    out_dim: usize,

    // Action-value function
    q: Q,

    // Optimizer
    opt: Optimizer,
}

impl<Q> DqnModel<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Constructs [`DqnModel`] with randomly initialized parameters.
    pub fn build(config: DqnModelConfig<Q::Config>, device: Device) -> Result<Self> {
        let q_config = config.q_config.context("q_config is not set.")?;
        let out_dim = q_config.get_out_dim();
        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            out_dim,
            q,
            opt,
        })
    }
}

impl<O, Q> ValueNetwork<O> for DqnModel<Q>
where
    O: Obs,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    type Params = NamedTensors;

    fn n_actions(&self) -> usize {
        self.out_dim
    }

    fn forward(&self, obs: &[O]) -> Result<Vec<Vec<f32>>> {
        let x = obs_to_tensor(obs, &self.device)?;
        Ok(self.q.forward(&x)?.to_vec2::<f32>()?)
    }

    fn fit(&mut self, obs: &[O], actions: &[usize], targets: &[f32]) -> Result<f32> {
        let n = obs.len();
        if actions.len() != n || targets.len() != n {
            bail!(
                "batch of {} observations, {} actions and {} targets",
                n,
                actions.len(),
                targets.len()
            );
        }
        if let Some(a) = actions.iter().find(|a| **a >= self.out_dim) {
            bail!("action {} out of {} actions", a, self.out_dim);
        }

        let x = obs_to_tensor(obs, &self.device)?;
        let act = actions.iter().map(|a| *a as u32).collect::<Vec<_>>();
        let act = Tensor::from_vec(act, (n, 1), &self.device)?;
        let tgt = Tensor::from_slice(targets, (n,), &self.device)?;

        let pred = self
            .q
            .forward(&x)?
            .gather(&act, D::Minus1)?
            .squeeze(D::Minus1)?;
        let loss = smooth_l1_loss(&pred, &tgt)?;
        self.opt.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn parameters(&self) -> Result<NamedTensors> {
        NamedTensors::copy_from(&self.varmap)
    }

    fn load_parameters(&mut self, params: &NamedTensors) -> Result<()> {
        params.copy_to(&self.varmap)
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.varmap.save(path)?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.varmap.load(path)?;
        info!("Loaded the model from {:?}.", path);
        Ok(())
    }
}
