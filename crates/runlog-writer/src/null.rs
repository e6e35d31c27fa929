use serde_json::Value;

use runlog_core::errors::RunError;
use runlog_core::{Figure, Hparams, Image, MetricSummary};

use crate::writer::RunRecorder;

/// No-op recorder standing in for [`crate::RunWriter`] when recording is
/// disabled.
///
/// Performs no I/O, holds no state, and never fails, so callers constructed
/// with either implementation behave identically apart from the artifacts
/// on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRunWriter;

impl NullRunWriter {
    /// Creates the no-op recorder.
    pub fn new() -> Self {
        Self
    }
}

impl RunRecorder for NullRunWriter {
    fn write_scalar(&mut self, _tag: &str, _value: f64, _step: Option<u64>) -> Result<(), RunError> {
        Ok(())
    }

    fn write_image(
        &mut self,
        _tag: &str,
        _image: &Image,
        _step: Option<u64>,
    ) -> Result<(), RunError> {
        Ok(())
    }

    fn write_figure(
        &mut self,
        _tag: &str,
        _figure: &Figure,
        _step: Option<u64>,
    ) -> Result<(), RunError> {
        Ok(())
    }

    fn write_hparams(
        &mut self,
        _hparams: &Hparams,
        _metrics: &MetricSummary,
    ) -> Result<(), RunError> {
        Ok(())
    }

    fn write_json(&mut self, _tag: &str, _data: &Value) -> Result<(), RunError> {
        Ok(())
    }

    fn write_textfile(&mut self, _tag: &str, _text: &str) -> Result<(), RunError> {
        Ok(())
    }

    fn write_checkpoint(&mut self, _tag: &str, _state: &[u8]) -> Result<(), RunError> {
        Ok(())
    }
}
