use super::Record;

/// Writes [`Record`]s to some destination.
///
/// Writing metrics must never abort training, so implementors handle their
/// own I/O failures, typically by logging them.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);

    /// Flushes buffered records, if any.
    fn flush(&mut self) {}
}
