use super::{Record, Recorder};
use anyhow::Result;
use csv::Writer;
use log::warn;
use std::{fs::File, path::Path};

/// Writes records as rows of a CSV file.
///
/// The columns are fixed at construction. Keys of a record that are not
/// columns are ignored and missing columns are left empty.
pub struct CsvRecorder {
    columns: Vec<String>,
    writer: Writer<File>,
}

impl CsvRecorder {
    /// Creates the file (truncating it if it exists) and writes the header.
    pub fn new<K: AsRef<str>>(path: impl AsRef<Path>, columns: &[K]) -> Result<Self> {
        let columns = columns
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>();
        let mut writer = Writer::from_path(path)?;
        writer.write_record(&columns)?;
        writer.flush()?;
        Ok(Self { columns, writer })
    }

    fn write_row(&mut self, record: &Record) -> Result<()> {
        let row = self
            .columns
            .iter()
            .map(|c| record.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect::<Vec<_>>();
        self.writer.write_record(&row)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl Recorder for CsvRecorder {
    fn write(&mut self, record: Record) {
        if let Err(e) = self.write_row(&record) {
            warn!("Failed to write a record: {}", e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!("Failed to flush records: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordValue;
    use tempdir::TempDir;

    #[test]
    fn test_csv_rows() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let path = dir.path().join("rewards.csv");
        let mut recorder = CsvRecorder::new(&path, &["frame_idx", "episode_reward", "loss"])?;

        recorder.write(Record::from_slice(&[
            ("frame_idx", RecordValue::Scalar(812.0)),
            ("episode_reward", RecordValue::Scalar(-21.0)),
            ("ignored", RecordValue::Scalar(1.0)),
        ]));
        recorder.write(Record::from_slice(&[
            ("frame_idx", RecordValue::Scalar(1650.0)),
            ("episode_reward", RecordValue::Scalar(-20.0)),
            ("loss", RecordValue::Scalar(0.5)),
        ]));
        recorder.flush();

        let content = std::fs::read_to_string(&path)?;
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec!["frame_idx,episode_reward,loss", "812,-21,", "1650,-20,0.5"]
        );
        Ok(())
    }
}
