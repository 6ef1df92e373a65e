//! Stacked frame observation.
use anyhow::Result;
use arcade_core::Obs;
use ndarray::{stack, Array2, Array3, ArrayView2, Axis};
use std::sync::Arc;

/// The last K processed frames, oldest first.
///
/// Frames are shared between consecutive observations, so a transition
/// stores only references to frames already held by the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedFrames {
    frames: Vec<Arc<Array2<f32>>>,
}

impl StackedFrames {
    /// Constructs an observation from frames ordered oldest first.
    pub fn new(frames: Vec<Arc<Array2<f32>>>) -> Self {
        Self { frames }
    }

    /// The frames, oldest first.
    pub fn frames(&self) -> &[Arc<Array2<f32>>] {
        &self.frames
    }

    /// The number of stacked frames.
    pub fn n_stack(&self) -> usize {
        self.frames.len()
    }

    /// Stacks the frames along a new leading axis, giving shape `(K, H, W)`.
    pub fn to_array(&self) -> Result<Array3<f32>> {
        let views = self.frames.iter().map(|f| f.view()).collect::<Vec<ArrayView2<f32>>>();
        Ok(stack(Axis(0), &views)?)
    }
}

impl Obs for StackedFrames {
    fn shape(&self) -> Vec<usize> {
        match self.frames.first() {
            Some(f) => vec![self.frames.len(), f.nrows(), f.ncols()],
            None => vec![0, 0, 0],
        }
    }

    fn extend_flat(&self, buf: &mut Vec<f32>) {
        for f in self.frames.iter() {
            buf.extend(f.iter());
        }
    }
}
