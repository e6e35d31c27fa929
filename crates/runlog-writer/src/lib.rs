#![deny(missing_docs)]

//! Durable recording for long-running experiments.
//!
//! A [`RunWriter`] owns a timestamp-named directory under a configurable
//! root and records scalar series, images, figures, JSON/text artifacts,
//! and crash-safe checkpoints into it. Console traffic is duplicated into
//! per-run `stdout`/`stderr` files through an explicit [`StdioCapture`]
//! guard. When recording is disabled, [`NullRunWriter`] stands in behind
//! the same [`RunRecorder`] trait so call sites never branch.

/// No-op recorder used when recording is disabled.
pub mod null;
/// Run directory allocation and path derivation.
pub mod rundir;
/// Metrics-sink seam and the default JSON-lines backend.
pub mod sink;
/// Stdio duplication guard.
pub mod stdio;
/// Generic write fan-out.
pub mod tee;
/// The run writer and its capability trait.
pub mod writer;

pub use null::NullRunWriter;
pub use rundir::RunDir;
pub use sink::{Event, EventLogSink, MetricsSink};
pub use stdio::StdioCapture;
pub use tee::StreamTee;
pub use writer::{RunRecorder, RunWriter};
