//! Types and traits for recording training metrics.
//!
//! * [`Record`] - A container of key-value pairs of various data types
//! * [`RecordValue`] - The values that can be stored in a [`Record`]
//! * [`Recorder`] - The interface for writing records somewhere
//! * [`CsvRecorder`] - Writes one row per record to a CSV file
//! * [`BufferedRecorder`] - Keeps records in memory (useful for testing)
//! * [`NullRecorder`] - Discards all records
//!
//! ```rust
//! use arcade_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("episode_reward", -21.0);
//! record.insert("frame_idx", RecordValue::Scalar(1024.0));
//! assert_eq!(record.get_scalar("episode_reward").unwrap(), -21.0);
//! ```
mod base;
mod buffered_recorder;
mod csv_recorder;
mod null_recorder;
mod recorder;
pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use csv_recorder::CsvRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
