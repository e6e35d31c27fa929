#![deny(missing_docs)]
#![doc = "Core error and record types for the runlog experiment recorder."]

pub mod errors;
mod record;

pub use errors::{ErrorInfo, RunError};
pub use record::{Figure, FigureFormat, Hparams, Image, MetricSummary};
