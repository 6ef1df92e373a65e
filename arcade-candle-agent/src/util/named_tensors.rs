use anyhow::{anyhow, Context, Result};
use candle_core::Tensor;
use candle_nn::VarMap;
use std::collections::HashMap;

/// Deep copy of the parameters held by a [`VarMap`], keyed by name.
#[derive(Clone, Debug)]
pub struct NamedTensors {
    /// Copied parameters.
    pub named_tensors: HashMap<String, Tensor>,
}

impl NamedTensors {
    /// Copies data of [`VarMap`].
    ///
    /// The copies do not share storage with the variables, so later updates of
    /// the variables do not change them.
    pub fn copy_from(vs: &VarMap) -> Result<Self> {
        let data = vs.data().lock().map_err(|e| anyhow!("{}", e))?;
        let mut named_tensors = HashMap::with_capacity(data.len());
        for (k, v) in data.iter() {
            named_tensors.insert(k.clone(), v.as_tensor().copy()?);
        }
        Ok(Self { named_tensors })
    }

    /// Copies named tensors into the variables of [`VarMap`] with the same names.
    ///
    /// Fails if the names or shapes of the parameters differ.
    pub fn copy_to(&self, vs: &VarMap) -> Result<()> {
        let data = vs.data().lock().map_err(|e| anyhow!("{}", e))?;
        if data.len() != self.named_tensors.len() {
            return Err(anyhow!(
                "{} parameters cannot be copied into {} variables",
                self.named_tensors.len(),
                data.len()
            ));
        }
        for (name, dest) in data.iter() {
            let src = self
                .named_tensors
                .get(name)
                .with_context(|| format!("missing parameter {}", name))?;
            dest.set(src)?;
        }
        Ok(())
    }
}
