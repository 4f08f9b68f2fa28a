//! Configuration Resolution Tests
//!
//! Precedence is flag > environment > config file > built-in default.
//! Environment variables are process-global, so every test touching them
//! runs serially.

use clap::Parser;
use serial_test::serial;
use snapshotter::config::{self, CliArgs};
use snapshotter::constants::env;
use snapshotter::errors::ConfigError;
use snapshotter::{Mode, PollTimeoutPolicy};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const BASE_ARGS: &[&str] = &[
    "snapshotter",
    "--service-name",
    "search",
    "--env",
    "staging",
    "--bucket",
    "backups",
    "--date",
    "20250115",
];

fn clear_aws_env() {
    std::env::remove_var(env::AWS_REGION);
    std::env::remove_var(env::AWS_ACCESS_KEY_ID);
    std::env::remove_var(env::AWS_SECRET_ACCESS_KEY);
}

fn parse(extra: &[&str]) -> CliArgs {
    let args: Vec<&str> = BASE_ARGS.iter().chain(extra.iter()).copied().collect();
    CliArgs::try_parse_from(args).unwrap()
}

#[test]
#[serial]
fn test_credentials_fall_back_to_environment() {
    clear_aws_env();
    std::env::set_var(env::AWS_REGION, "us-east-1");
    std::env::set_var(env::AWS_ACCESS_KEY_ID, "AKIAFROMENV");
    std::env::set_var(env::AWS_SECRET_ACCESS_KEY, "secret-from-env");

    let resolved = config::load(&parse(&[])).unwrap();
    clear_aws_env();

    assert_eq!(resolved.storage.region, "us-east-1");
    assert_eq!(resolved.storage.access_key, "AKIAFROMENV");
    assert_eq!(resolved.storage.secret_key, "secret-from-env");
    assert_eq!(resolved.repository_name(), "202501");
    assert_eq!(resolved.snapshot_name(), "15");
}

#[test]
#[serial]
fn test_flag_beats_environment() {
    clear_aws_env();
    std::env::set_var(env::AWS_REGION, "us-east-1");

    let resolved = config::load(&parse(&[
        "--region",
        "eu-central-1",
        "--access-key",
        "AKIAFLAG",
        "--secret-key",
        "flag-secret",
    ]))
    .unwrap();
    clear_aws_env();

    assert_eq!(resolved.storage.region, "eu-central-1");
}

#[test]
#[serial]
fn test_missing_secret_key_is_reported() {
    clear_aws_env();

    let err = config::load(&parse(&["--region", "eu-west-1", "--access-key", "AKIA"])).unwrap_err();

    assert_eq!(
        err,
        ConfigError::MissingRequired {
            field: "secret-key".to_string()
        }
    );
    assert_eq!(err.to_string(), "--secret-key is required");
}

#[test]
#[serial]
fn test_config_file_fills_gaps_below_environment() {
    clear_aws_env();
    std::env::set_var(env::AWS_REGION, "ap-southeast-2");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
url = "http://search.internal:9200"
region = "eu-west-1"
access_key = "AKIAFILE"
secret_key = "file-secret"
max_retries = 4
retry_interval = "30s"
restore = true
fail_on_poll_timeout = true
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let resolved = config::load(&parse(&["--config", &path])).unwrap();
    clear_aws_env();

    assert_eq!(resolved.url, "http://search.internal:9200");
    assert_eq!(resolved.storage.region, "ap-southeast-2");
    assert_eq!(resolved.storage.access_key, "AKIAFILE");
    assert_eq!(resolved.max_retries, 4);
    assert_eq!(resolved.retry_interval, Duration::from_secs(30));
    assert_eq!(resolved.mode, Mode::Restore);
    assert_eq!(resolved.poll_timeout_policy, PollTimeoutPolicy::Fail);
}

#[test]
#[serial]
fn test_missing_config_file_is_a_load_error() {
    clear_aws_env();

    let err = config::load(&parse(&["--config", "/nonexistent/snapshotter.toml"])).unwrap_err();

    assert!(matches!(err, ConfigError::LoadFailed { .. }));
}
