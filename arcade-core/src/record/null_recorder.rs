use super::{Record, Recorder};

/// A recorder that discards all records.
#[derive(Default)]
pub struct NullRecorder {}

impl NullRecorder {
    /// Constructs [`NullRecorder`].
    pub fn new() -> Self {
        Self {}
    }
}

impl Recorder for NullRecorder {
    fn write(&mut self, _record: Record) {}
}
