use std::fs::{File, OpenOptions};
use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;

use runlog_core::errors::{ErrorInfo, RunError};

use crate::rundir::RunDir;
use crate::tee::StreamTee;

/// Caller-held guard duplicating console traffic into per-run log files.
///
/// Acquired from [`crate::RunWriter::capture_stdio`] and installed
/// deliberately by the caller; dropping the guard flushes both log files
/// and releases them, restoring plain console streams. Holding two live
/// guards in one process is caller misuse and interleaves the logs.
#[derive(Debug)]
pub struct StdioCapture {
    out: StreamTee<Stdout, File>,
    err: StreamTee<Stderr, File>,
}

impl StdioCapture {
    /// Opens `stdout` and `stderr` append-mode inside the run directory and
    /// binds a tee over each console stream.
    pub fn install(dir: &RunDir) -> Result<Self, RunError> {
        let out_file = open_log(&dir.stdout_path())?;
        let err_file = open_log(&dir.stderr_path())?;
        Ok(Self {
            out: StreamTee::new(io::stdout(), out_file),
            err: StreamTee::new(io::stderr(), err_file),
        })
    }

    /// Handle carrying console-out traffic to both destinations.
    pub fn out(&mut self) -> &mut StreamTee<Stdout, File> {
        &mut self.out
    }

    /// Handle carrying console-err traffic to both destinations.
    pub fn err(&mut self) -> &mut StreamTee<Stderr, File> {
        &mut self.err
    }

    /// Flushes both consoles and both log files.
    pub fn flush(&mut self) -> Result<(), RunError> {
        self.out
            .flush()
            .and_then(|()| self.err.flush())
            .map_err(|err| {
                RunError::Io(
                    ErrorInfo::new("stdio-flush", "failed to flush duplicated streams")
                        .with_hint(err.to_string()),
                )
            })
    }
}

impl Drop for StdioCapture {
    fn drop(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}

fn open_log(path: &Path) -> Result<File, RunError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            RunError::Config(
                ErrorInfo::new("stdio-open", "failed to open console log file")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
}
