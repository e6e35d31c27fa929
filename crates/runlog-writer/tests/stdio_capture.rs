use std::fs;
use std::io::Write;

use runlog_writer::RunWriter;
use tempfile::tempdir;

#[test]
fn console_traffic_lands_in_the_log_files() {
    let root = tempdir().expect("tempdir");
    let writer = RunWriter::create(root.path(), "exp1").expect("writer");

    let mut capture = writer.capture_stdio().expect("capture");
    write!(capture.out(), "epoch 1 done\n").expect("out");
    write!(capture.err(), "warning: slow batch\n").expect("err");
    capture.flush().expect("flush");

    let out = fs::read_to_string(writer.run_dir().join("stdout")).expect("stdout");
    let err = fs::read_to_string(writer.run_dir().join("stderr")).expect("stderr");
    assert_eq!(out, "epoch 1 done\n");
    assert_eq!(err, "warning: slow batch\n");
}

#[test]
fn drop_flushes_pending_bytes() {
    let root = tempdir().expect("tempdir");
    let writer = RunWriter::create(root.path(), "exp1").expect("writer");

    {
        let mut capture = writer.capture_stdio().expect("capture");
        write!(capture.out(), "unflushed line").expect("out");
    }

    let out = fs::read_to_string(writer.run_dir().join("stdout")).expect("stdout");
    assert_eq!(out, "unflushed line");
}

#[test]
fn reacquired_capture_appends_instead_of_truncating() {
    let root = tempdir().expect("tempdir");
    let writer = RunWriter::create(root.path(), "exp1").expect("writer");

    {
        let mut capture = writer.capture_stdio().expect("capture");
        write!(capture.out(), "first\n").expect("out");
    }
    {
        let mut capture = writer.capture_stdio().expect("capture");
        write!(capture.out(), "second\n").expect("out");
    }

    let out = fs::read_to_string(writer.run_dir().join("stdout")).expect("stdout");
    assert_eq!(out, "first\nsecond\n");
}

#[cfg(unix)]
#[test]
fn tee_preserves_the_primary_descriptor() {
    use std::os::unix::io::AsRawFd;

    let root = tempdir().expect("tempdir");
    let writer = RunWriter::create(root.path(), "exp1").expect("writer");

    let mut capture = writer.capture_stdio().expect("capture");
    assert_eq!(capture.out().as_raw_fd(), std::io::stdout().as_raw_fd());
    assert_eq!(capture.err().as_raw_fd(), std::io::stderr().as_raw_fd());
}
