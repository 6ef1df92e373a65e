use crate::util::OutDim;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    /// The number of stacked frames, i.e., input channels.
    pub n_stack: usize,

    /// Height of input frames.
    pub in_height: usize,

    /// Width of input frames.
    pub in_width: usize,

    /// The number of units of the hidden linear layer.
    pub hidden_dim: usize,

    /// The number of actions.
    pub out_dim: usize,
}

impl Default for CnnConfig {
    fn default() -> Self {
        Self {
            n_stack: 4,
            in_height: 84,
            in_width: 84,
            hidden_dim: 512,
            out_dim: 6,
        }
    }
}

impl CnnConfig {
    /// Constructs a configuration for `out_dim` actions with the default input.
    pub fn new(out_dim: usize) -> Self {
        Self {
            out_dim,
            ..Default::default()
        }
    }

    /// Sets the number of stacked frames.
    pub fn n_stack(mut self, v: usize) -> Self {
        self.n_stack = v;
        self
    }

    /// Sets the size of input frames.
    pub fn in_size(mut self, height: usize, width: usize) -> Self {
        self.in_height = height;
        self.in_width = width;
        self
    }

    /// Sets the number of units of the hidden layer.
    pub fn hidden_dim(mut self, v: usize) -> Self {
        self.hidden_dim = v;
        self
    }
}

impl OutDim for CnnConfig {
    /// Gets output dimension.
    fn get_out_dim(&self) -> usize {
        self.out_dim
    }

    /// Sets output dimension.
    fn set_out_dim(&mut self, v: usize) {
        self.out_dim = v;
    }
}
