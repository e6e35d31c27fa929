use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, RunError};

/// Hyperparameter map recorded once per run.
pub type Hparams = BTreeMap<String, Value>;

/// Summary metrics associated with a hyperparameter record.
pub type MetricSummary = BTreeMap<String, f64>;

/// Raw image buffer in row-major H x W x C layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Height in pixels.
    pub height: u32,
    /// Width in pixels.
    pub width: u32,
    /// Number of channels (1 for grayscale, 3 for RGB, 4 for RGBA).
    pub channels: u8,
    /// Pixel bytes, `height * width * channels` long.
    pub data: Vec<u8>,
}

impl Image {
    /// Builds an image after checking the buffer length against its shape.
    pub fn new(height: u32, width: u32, channels: u8, data: Vec<u8>) -> Result<Self, RunError> {
        let expected = height as usize * width as usize * channels as usize;
        if data.len() != expected {
            return Err(RunError::Serde(
                ErrorInfo::new("image-shape", "pixel buffer does not match declared shape")
                    .with_context("expected", expected.to_string())
                    .with_context("actual", data.len().to_string()),
            ));
        }
        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }
}

/// Encoding of a pre-rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureFormat {
    /// Scalable vector graphics text.
    Svg,
    /// Portable network graphics bytes.
    Png,
}

/// A figure rendered upstream of the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Figure {
    /// Encoding of the rendered bytes.
    pub format: FigureFormat,
    /// Rendered figure content.
    pub bytes: Vec<u8>,
}

impl Figure {
    /// Wraps SVG text as a figure.
    pub fn svg(text: impl Into<String>) -> Self {
        Self {
            format: FigureFormat::Svg,
            bytes: text.into().into_bytes(),
        }
    }

    /// Wraps PNG bytes as a figure.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            format: FigureFormat::Png,
            bytes,
        }
    }
}
