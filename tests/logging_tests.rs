//! The global subscriber can only be installed once per process, so this file
//! holds a single test.

use chatline::cli::{init_logging, LogTarget};

#[test]
fn test_file_target_receives_log_lines() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("chatline.log");

    init_logging(&LogTarget::File(path.clone()), true).expect("logger installed");
    tracing::info!("conversation started");

    let contents = std::fs::read_to_string(&path).expect("log file written");
    assert!(contents.contains("conversation started"));
    assert!(contents.contains("INFO"));

    let second = init_logging(&LogTarget::Stderr, false);
    assert!(second.is_err(), "a second global subscriber must be refused");
}
