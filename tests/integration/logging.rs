//! File logging setup.
//!
//! The global logger can only be installed once per process, so this file
//! holds a single test that covers both the first and a repeated setup.
use chrono::Utc;
use evm_kms_signer::logging::{compute_rolled_file_path, setup_logging, LoggingError};
use std::{env, fs, path::Path, thread, time::Duration};

#[test]
fn test_setup_logging_file_mode_creates_log_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let base = temp_dir.path().join("nested").join("kms-signer.log");
    let base = base.to_string_lossy().to_string();

    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("LOG_FILE_PATH", &base);

    setup_logging().unwrap();
    log::info!("integration log line");
    // Sleep for logger to flush
    thread::sleep(Duration::from_millis(200));

    let date_str = Utc::now().format("%Y-%m-%d").to_string();
    let expected_path = compute_rolled_file_path(&base, &date_str);
    assert!(
        Path::new(&expected_path).exists(),
        "Expected log file {} does not exist",
        expected_path
    );
    let contents = fs::read_to_string(&expected_path).unwrap();
    assert!(contents.contains("integration log line"));

    assert!(matches!(setup_logging(), Err(LoggingError::Init(_))));

    for name in ["LOG_MODE", "LOG_LEVEL", "LOG_FILE_PATH"] {
        env::remove_var(name);
    }
}
