use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use runlog_core::errors::{ErrorInfo, RunError};
use runlog_core::{Figure, Hparams, Image, MetricSummary};

/// A single record appended to the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Scalar series point.
    Scalar {
        /// Namespaced tag of the series.
        tag: String,
        /// Recorded value.
        value: f64,
        /// Optional step within the run.
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<u64>,
        /// RFC 3339 wall-clock time of the record.
        wall_time: String,
    },
    /// Image record.
    Image {
        /// Namespaced tag.
        tag: String,
        /// Raw image buffer.
        image: Image,
        /// Optional step within the run.
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<u64>,
        /// RFC 3339 wall-clock time of the record.
        wall_time: String,
    },
    /// Pre-rendered figure record.
    Figure {
        /// Namespaced tag.
        tag: String,
        /// Rendered figure bytes and format.
        figure: Figure,
        /// Optional step within the run.
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<u64>,
        /// RFC 3339 wall-clock time of the record.
        wall_time: String,
    },
    /// Free-form text record.
    Text {
        /// Namespaced tag.
        tag: String,
        /// Text payload.
        text: String,
        /// Optional step within the run.
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<u64>,
        /// RFC 3339 wall-clock time of the record.
        wall_time: String,
    },
    /// One-time hyperparameter/metric association.
    Hparams {
        /// Hyperparameters of the run.
        hparams: Hparams,
        /// Summary metrics attached to them.
        metrics: MetricSummary,
        /// RFC 3339 wall-clock time of the record.
        wall_time: String,
    },
}

/// Backend accepting namespaced records for a run.
///
/// The writer treats the sink as an injected capability; tests substitute a
/// recording fake and assert on the calls received.
pub trait MetricsSink {
    /// Appends a scalar series point.
    fn add_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<(), RunError>;

    /// Appends an image.
    fn add_image(&mut self, tag: &str, image: &Image, step: Option<u64>) -> Result<(), RunError>;

    /// Appends a rendered figure.
    fn add_figure(&mut self, tag: &str, figure: &Figure, step: Option<u64>)
        -> Result<(), RunError>;

    /// Appends a text record.
    fn add_text(&mut self, tag: &str, text: &str, step: Option<u64>) -> Result<(), RunError>;

    /// Records a one-time hyperparameter/metric association.
    fn add_hparams(&mut self, hparams: &Hparams, metrics: &MetricSummary) -> Result<(), RunError>;

    /// Forces buffered records to stable storage.
    fn flush(&mut self) -> Result<(), RunError>;
}

/// Default sink appending one JSON object per line to `events.jsonl`
/// inside the run directory.
///
/// Each record is flushed as soon as it is appended so the file stays
/// inspectable while the run is still going.
#[derive(Debug)]
pub struct EventLogSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl EventLogSink {
    /// File name of the event log inside a run directory.
    pub const FILE_NAME: &'static str = "events.jsonl";

    /// Opens (append-mode) the event log inside `run_dir`.
    pub fn create(run_dir: &Path) -> Result<Self, RunError> {
        let path = run_dir.join(Self::FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                RunError::Sink(
                    ErrorInfo::new("event-log-open", "failed to open event log")
                        .with_context("path", path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Path of the backing event log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, event: &Event) -> Result<(), RunError> {
        let line = serde_json::to_string(event).map_err(|err| {
            RunError::Serde(ErrorInfo::new("event-serialize", err.to_string()))
        })?;
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush())
            .map_err(|err| {
                RunError::Sink(
                    ErrorInfo::new("event-append", "failed to append event record")
                        .with_context("path", self.path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })
    }
}

fn wall_time() -> String {
    Utc::now().to_rfc3339()
}

impl MetricsSink for EventLogSink {
    fn add_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<(), RunError> {
        self.append(&Event::Scalar {
            tag: tag.to_string(),
            value,
            step,
            wall_time: wall_time(),
        })
    }

    fn add_image(&mut self, tag: &str, image: &Image, step: Option<u64>) -> Result<(), RunError> {
        self.append(&Event::Image {
            tag: tag.to_string(),
            image: image.clone(),
            step,
            wall_time: wall_time(),
        })
    }

    fn add_figure(
        &mut self,
        tag: &str,
        figure: &Figure,
        step: Option<u64>,
    ) -> Result<(), RunError> {
        self.append(&Event::Figure {
            tag: tag.to_string(),
            figure: figure.clone(),
            step,
            wall_time: wall_time(),
        })
    }

    fn add_text(&mut self, tag: &str, text: &str, step: Option<u64>) -> Result<(), RunError> {
        self.append(&Event::Text {
            tag: tag.to_string(),
            text: text.to_string(),
            step,
            wall_time: wall_time(),
        })
    }

    fn add_hparams(&mut self, hparams: &Hparams, metrics: &MetricSummary) -> Result<(), RunError> {
        self.append(&Event::Hparams {
            hparams: hparams.clone(),
            metrics: metrics.clone(),
            wall_time: wall_time(),
        })
    }

    fn flush(&mut self) -> Result<(), RunError> {
        self.writer.flush().map_err(|err| {
            RunError::Sink(
                ErrorInfo::new("event-flush", "failed to flush event log")
                    .with_context("path", self.path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
    }
}
