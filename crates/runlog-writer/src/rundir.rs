use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use runlog_core::errors::{ErrorInfo, RunError};

/// Directory layout for a single recorded run.
///
/// The directory name is derived from the local time at second granularity
/// (`Mar05_14-22-01`). Two runs starting within the same second get a
/// numeric suffix (`Mar05_14-22-01_1`) instead of sharing a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    /// Allocates a fresh run directory under `root`, creating `root`
    /// recursively if needed.
    pub fn allocate(root: &Path) -> Result<Self, RunError> {
        fs::create_dir_all(root).map_err(|err| {
            RunError::Config(
                ErrorInfo::new("rundir-root", "failed to create run root")
                    .with_context("path", root.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let stamp = Local::now().format("%b%d_%H-%M-%S").to_string();
        let mut attempt: u32 = 0;
        loop {
            let candidate = if attempt == 0 {
                root.join(&stamp)
            } else {
                root.join(format!("{stamp}_{attempt}"))
            };
            match fs::create_dir(&candidate) {
                Ok(()) => return Ok(Self { path: candidate }),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => {
                    return Err(RunError::Config(
                        ErrorInfo::new("rundir-create", "failed to create run directory")
                            .with_context("path", candidate.display().to_string())
                            .with_hint(err.to_string()),
                    ))
                }
            }
        }
    }

    /// Wraps an already existing directory, for reopening a prior run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(RunError::Config(
                ErrorInfo::new("rundir-missing", "run directory does not exist")
                    .with_context("path", path.display().to_string()),
            ));
        }
        Ok(Self { path })
    }

    /// Absolute or caller-relative path of the run directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the duplicated console-out log.
    pub fn stdout_path(&self) -> PathBuf {
        self.path.join("stdout")
    }

    /// Path of the duplicated console-err log.
    pub fn stderr_path(&self) -> PathBuf {
        self.path.join("stderr")
    }

    /// Path of the checkpoints subdirectory. Created lazily on the first
    /// checkpoint write, not here.
    pub fn checkpoints_dir(&self) -> PathBuf {
        self.path.join("checkpoints")
    }

    /// Final path for the checkpoint stored under `tag`.
    pub fn checkpoint_path(&self, tag: &str) -> PathBuf {
        self.checkpoints_dir().join(format!("{tag}.ckpt"))
    }

    /// Path for a flat artifact such as `<tag>.json` or `<tag>.txt`.
    pub fn artifact_path(&self, tag: &str, extension: &str) -> PathBuf {
        self.path.join(format!("{tag}.{extension}"))
    }
}

/// Creates the parent directory of `path` if it does not exist yet.
///
/// Tags may contain `/`, which maps to nested artifact directories.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), RunError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            RunError::Io(
                ErrorInfo::new("artifact-mkdir", "failed to create artifact directory")
                    .with_context("path", parent.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    }
    Ok(())
}
