use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use runlog_core::errors::{ErrorInfo, RunError};
use runlog_core::{Figure, Hparams, Image, MetricSummary};

use crate::rundir::{ensure_parent, RunDir};
use crate::sink::{EventLogSink, MetricsSink};
use crate::stdio::StdioCapture;

/// Capability surface shared by [`RunWriter`] and
/// [`crate::NullRunWriter`].
///
/// Callers pick one implementation at startup (typically behind
/// `Box<dyn RunRecorder>`) and never branch on a recording flag again.
/// Every operation blocks until the underlying I/O completes and surfaces
/// failures synchronously; nothing is retried.
pub trait RunRecorder {
    /// Appends a scalar series point under `tag`.
    fn write_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<(), RunError>;

    /// Appends an image under `tag`.
    fn write_image(&mut self, tag: &str, image: &Image, step: Option<u64>)
        -> Result<(), RunError>;

    /// Appends a rendered figure under `tag`.
    fn write_figure(
        &mut self,
        tag: &str,
        figure: &Figure,
        step: Option<u64>,
    ) -> Result<(), RunError>;

    /// Records a one-time hyperparameter/metric association.
    fn write_hparams(&mut self, hparams: &Hparams, metrics: &MetricSummary)
        -> Result<(), RunError>;

    /// Records `data` as an indented text block in the sink and mirrors the
    /// same JSON verbatim to `<run_dir>/<tag>.json`.
    fn write_json(&mut self, tag: &str, data: &Value) -> Result<(), RunError>;

    /// Writes `text` verbatim to `<run_dir>/<tag>.txt`.
    fn write_textfile(&mut self, tag: &str, text: &str) -> Result<(), RunError>;

    /// Atomically persists `state` to `<run_dir>/checkpoints/<tag>.ckpt`.
    ///
    /// The final path holds either the previous complete checkpoint or the
    /// new complete one at every instant, even if the process dies mid-save.
    fn write_checkpoint(&mut self, tag: &str, state: &[u8]) -> Result<(), RunError>;

    /// Serializes `state` with bincode, then persists it via
    /// [`RunRecorder::write_checkpoint`]. Serialization failures surface
    /// before any file is touched.
    fn write_checkpoint_state<T: Serialize>(&mut self, tag: &str, state: &T) -> Result<(), RunError>
    where
        Self: Sized,
    {
        let bytes = bincode::serialize(state).map_err(|err| {
            RunError::Serde(
                ErrorInfo::new("checkpoint-encode", err.to_string()).with_context("tag", tag),
            )
        })?;
        self.write_checkpoint(tag, &bytes)
    }
}

/// Records a single run's metrics, artifacts, and checkpoints under a
/// timestamp-named directory.
///
/// Construction allocates the run directory and initializes the sink; the
/// stdio duplication guard is acquired separately through
/// [`RunWriter::capture_stdio`]. One writer per run; concurrent writes from
/// several threads must be serialized by the caller.
pub struct RunWriter {
    dir: RunDir,
    sink: Box<dyn MetricsSink>,
    tag_group: String,
}

impl RunWriter {
    /// Creates a run rooted under `root` with the default
    /// [`EventLogSink`]. Every tag is namespaced as `<tag_group>/<tag>`.
    pub fn create(root: impl AsRef<Path>, tag_group: impl Into<String>) -> Result<Self, RunError> {
        let dir = RunDir::allocate(root.as_ref())?;
        let sink = EventLogSink::create(dir.path())?;
        Ok(Self::with_sink(dir, Box::new(sink), tag_group))
    }

    /// Creates a run over a caller-provided sink backend.
    pub fn with_sink(
        dir: RunDir,
        sink: Box<dyn MetricsSink>,
        tag_group: impl Into<String>,
    ) -> Self {
        Self {
            dir,
            sink,
            tag_group: tag_group.into(),
        }
    }

    /// Path of this run's directory.
    pub fn run_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Tag group prefixed to every recorded tag.
    pub fn tag_group(&self) -> &str {
        &self.tag_group
    }

    /// Acquires the stdio duplication guard for this run.
    pub fn capture_stdio(&self) -> Result<StdioCapture, RunError> {
        StdioCapture::install(&self.dir)
    }

    /// Forces buffered sink records to stable storage.
    pub fn flush(&mut self) -> Result<(), RunError> {
        self.sink.flush()
    }

    fn namespaced(&self, tag: &str) -> String {
        format!("{}/{tag}", self.tag_group)
    }

    fn write_artifact(&self, tag: &str, extension: &str, contents: &str) -> Result<PathBuf, RunError> {
        let path = self.dir.artifact_path(tag, extension);
        ensure_parent(&path)?;
        fs::write(&path, contents).map_err(|err| {
            RunError::Io(
                ErrorInfo::new("artifact-write", "failed to write artifact")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Ok(path)
    }

    /// Writes `state` to `<final>.tmp`, syncs it, then renames onto the
    /// final path. Rename within one filesystem is atomic, so readers see
    /// either the previous checkpoint or the new one, never a partial file.
    fn persist_checkpoint(&self, tag: &str, state: &[u8]) -> Result<(), RunError> {
        let final_path = self.dir.checkpoint_path(tag);
        ensure_parent(&final_path)?;
        let tmp_path = tmp_checkpoint_path(&final_path);

        let mut tmp = File::create(&tmp_path)
            .map_err(|err| checkpoint_io("checkpoint-tmp-create", &tmp_path, err))?;
        tmp.write_all(state)
            .and_then(|()| tmp.sync_all())
            .map_err(|err| checkpoint_io("checkpoint-tmp-write", &tmp_path, err))?;
        drop(tmp);

        fs::rename(&tmp_path, &final_path)
            .map_err(|err| checkpoint_io("checkpoint-rename", &final_path, err))
    }
}

impl RunRecorder for RunWriter {
    fn write_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<(), RunError> {
        self.sink.add_scalar(&self.namespaced(tag), value, step)
    }

    fn write_image(
        &mut self,
        tag: &str,
        image: &Image,
        step: Option<u64>,
    ) -> Result<(), RunError> {
        self.sink.add_image(&self.namespaced(tag), image, step)
    }

    fn write_figure(
        &mut self,
        tag: &str,
        figure: &Figure,
        step: Option<u64>,
    ) -> Result<(), RunError> {
        self.sink.add_figure(&self.namespaced(tag), figure, step)
    }

    fn write_hparams(
        &mut self,
        hparams: &Hparams,
        metrics: &MetricSummary,
    ) -> Result<(), RunError> {
        self.sink.add_hparams(hparams, metrics)
    }

    fn write_json(&mut self, tag: &str, data: &Value) -> Result<(), RunError> {
        let text = to_json_indented(data)?;
        // Leading 4 spaces on every line so viewers render a code block.
        let block = format!("    {}", text.replace('\n', "\n    "));
        self.sink.add_text(&self.namespaced(tag), &block, None)?;
        self.write_artifact(tag, "json", &text)?;
        Ok(())
    }

    fn write_textfile(&mut self, tag: &str, text: &str) -> Result<(), RunError> {
        self.write_artifact(tag, "txt", text)?;
        Ok(())
    }

    fn write_checkpoint(&mut self, tag: &str, state: &[u8]) -> Result<(), RunError> {
        self.persist_checkpoint(tag, state)
    }
}

/// Temporary-file path used during an atomic checkpoint write. The `.tmp`
/// suffix keeps an interrupted write from ever being mistaken for a final
/// checkpoint.
pub fn tmp_checkpoint_path(final_path: &Path) -> PathBuf {
    let mut name = final_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    final_path.with_file_name(name)
}

fn checkpoint_io(code: &str, path: &Path, err: std::io::Error) -> RunError {
    RunError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Serializes `data` with a 4-space indent, matching the formatting the
/// artifact file and the sink text record share.
fn to_json_indented(data: &Value) -> Result<String, RunError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)
        .map_err(|err| RunError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    String::from_utf8(buf)
        .map_err(|err| RunError::Serde(ErrorInfo::new("json-utf8", err.to_string())))
}
