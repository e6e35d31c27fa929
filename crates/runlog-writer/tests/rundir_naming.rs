use runlog_writer::RunDir;
use tempfile::tempdir;

fn is_timestamp_name(name: &str) -> bool {
    // Base form: Mar05_14-22-01, optional _<n> collision suffix.
    let base = match name.char_indices().nth(14) {
        Some((idx, '_')) => {
            let suffix = &name[idx + 1..];
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
                return false;
            }
            &name[..idx]
        }
        _ => name,
    };
    if base.len() != 14 {
        return false;
    }
    let bytes = base.as_bytes();
    bytes[0].is_ascii_uppercase()
        && bytes[1..3].iter().all(u8::is_ascii_lowercase)
        && bytes[3..5].iter().all(u8::is_ascii_digit)
        && bytes[5] == b'_'
        && bytes[6..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'-'
        && bytes[9..11].iter().all(u8::is_ascii_digit)
        && bytes[11] == b'-'
        && bytes[12..14].iter().all(u8::is_ascii_digit)
}

#[test]
fn allocated_directory_uses_second_granularity_stamp() {
    let root = tempdir().expect("tempdir");
    let dir = RunDir::allocate(root.path()).expect("allocate");

    assert!(dir.path().is_dir());
    let name = dir.path().file_name().expect("name").to_string_lossy();
    assert!(is_timestamp_name(&name), "unexpected name {name}");
}

#[test]
fn same_second_allocations_get_distinct_directories() {
    let root = tempdir().expect("tempdir");

    let dirs: Vec<_> = (0..3)
        .map(|_| RunDir::allocate(root.path()).expect("allocate"))
        .collect();

    for (i, a) in dirs.iter().enumerate() {
        for b in &dirs[i + 1..] {
            assert_ne!(a.path(), b.path());
        }
    }
    for dir in &dirs {
        assert!(dir.path().is_dir());
        let name = dir.path().file_name().expect("name").to_string_lossy();
        assert!(is_timestamp_name(&name), "unexpected name {name}");
    }
}

#[test]
fn root_is_created_recursively() {
    let root = tempdir().expect("tempdir");
    let nested = root.path().join("results/density/uci");

    let dir = RunDir::allocate(&nested).expect("allocate");
    assert!(dir.path().starts_with(&nested));
}

#[test]
fn open_rejects_missing_directory() {
    let root = tempdir().expect("tempdir");
    let err = RunDir::open(root.path().join("absent")).unwrap_err();
    assert_eq!(err.info().code, "rundir-missing");
}

#[test]
fn derived_paths_sit_inside_the_run_directory() {
    let root = tempdir().expect("tempdir");
    let dir = RunDir::allocate(root.path()).expect("allocate");

    assert_eq!(dir.stdout_path(), dir.path().join("stdout"));
    assert_eq!(dir.stderr_path(), dir.path().join("stderr"));
    assert_eq!(
        dir.checkpoint_path("epoch5"),
        dir.path().join("checkpoints/epoch5.ckpt")
    );
    assert_eq!(
        dir.artifact_path("config", "json"),
        dir.path().join("config.json")
    );
}
