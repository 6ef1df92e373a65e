//! Fixed-length queue of processed frames.
use crate::{AtariEnvError, StackedFrames};
use anyhow::Result;
use ndarray::Array2;
use std::{collections::VecDeque, sync::Arc};

/// Keeps the last `n_stack` processed frames, most recent last.
///
/// After [`ObservationStacker::reset`] or [`ObservationStacker::push`] the
/// queue holds exactly `n_stack` frames.
#[derive(Debug, Clone)]
pub struct ObservationStacker {
    n_stack: usize,
    frames: VecDeque<Arc<Array2<f32>>>,
}

impl ObservationStacker {
    /// Constructs an empty stacker.
    pub fn new(n_stack: usize) -> Result<Self> {
        if n_stack == 0 {
            return Err(AtariEnvError::InvalidConfig("n_stack must be positive".into()).into());
        }
        Ok(Self {
            n_stack,
            frames: VecDeque::with_capacity(n_stack + 1),
        })
    }

    /// The number of stacked frames.
    pub fn n_stack(&self) -> usize {
        self.n_stack
    }

    /// Clears the queue and fills every slot with `frame`.
    pub fn reset(&mut self, frame: Array2<f32>) {
        let frame = Arc::new(frame);
        self.frames.clear();
        for _ in 0..self.n_stack {
            self.frames.push_back(frame.clone());
        }
    }

    /// Appends `frame`, evicting the oldest frame.
    ///
    /// Pushing into an empty stacker behaves like [`ObservationStacker::reset`].
    pub fn push(&mut self, frame: Array2<f32>) {
        if self.frames.is_empty() {
            self.reset(frame);
            return;
        }
        self.frames.push_back(Arc::new(frame));
        while self.frames.len() > self.n_stack {
            self.frames.pop_front();
        }
    }

    /// The stacked frames, oldest first.
    pub fn current_state(&self) -> StackedFrames {
        StackedFrames::new(self.frames.iter().cloned().collect())
    }
}
