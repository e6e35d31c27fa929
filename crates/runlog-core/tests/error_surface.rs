use runlog_core::errors::{ErrorInfo, RunError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("path", "/tmp/run")
        .with_context("tag", "loss")
}

#[test]
fn config_error_surface() {
    let err = RunError::Config(sample_info("rundir-root", "cannot create root"));
    assert_eq!(err.info().code, "rundir-root");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn serde_error_surface() {
    let err = RunError::Serde(sample_info("json-encode", "not serializable"));
    assert_eq!(err.info().code, "json-encode");
    assert!(err.info().context.contains_key("tag"));
}

#[test]
fn io_error_surface() {
    let err = RunError::Io(sample_info("artifact-write", "disk full"));
    assert_eq!(err.info().code, "artifact-write");
}

#[test]
fn sink_error_surface() {
    let err = RunError::Sink(sample_info("event-append", "backend refused"));
    assert_eq!(err.info().code, "event-append");
}

#[test]
fn display_carries_context_and_hint() {
    let err = RunError::Io(
        ErrorInfo::new("checkpoint-rename", "rename failed")
            .with_context("path", "ckpt/epoch5.ckpt")
            .with_hint("check free space"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("checkpoint-rename"));
    assert!(rendered.contains("path=ckpt/epoch5.ckpt"));
    assert!(rendered.contains("hint: check free space"));
}

#[test]
fn error_info_round_trips_through_json() {
    let err = RunError::Serde(sample_info("event-serialize", "bad payload"));
    let json = serde_json::to_string(&err).expect("serialize");
    let back: RunError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(err, back);
}
