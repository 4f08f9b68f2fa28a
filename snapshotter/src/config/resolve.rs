// File: snapshotter/src/config/resolve.rs
//! Turns flags, environment and file values into a [`ResolvedConfig`].
//!
//! Environment fallback for the AWS region and keys is applied by clap while
//! parsing, so by the time values reach [`resolve`] a flag and its environment
//! variable are indistinguishable.

use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tracing::debug;

use super::{CliArgs, ConfigFile, Mode, PollTimeoutPolicy, ResolvedConfig, StorageSettings};
use crate::constants::{defaults, http};
use crate::errors::ConfigError;
use crate::naming::{parse_reference_date, validate_template};

/// Load the optional config file named by `--config` and resolve against the
/// local current date.
pub fn load(args: &CliArgs) -> Result<ResolvedConfig, ConfigError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    resolve(args, &file, Local::now().naive_local())
}

/// Resolve configuration, validating every field.
///
/// `today` is the reference date used when no `--date` is supplied.
pub fn resolve(
    args: &CliArgs,
    file: &ConfigFile,
    today: NaiveDateTime,
) -> Result<ResolvedConfig, ConfigError> {
    let service_name = required("service-name", pick(&args.service_name, &file.service_name))?;
    let env = required("env", pick(&args.env, &file.env))?;

    let retry_interval_str = pick(&args.retry_interval, &file.retry_interval)
        .unwrap_or_else(|| defaults::RETRY_INTERVAL.to_string());
    let retry_interval = parse_duration("retry-interval", &retry_interval_str)?;

    let bucket = required("bucket", pick(&args.bucket, &file.bucket))?;
    let region = required("region", pick(&args.region, &file.region))?;
    let access_key = required("access-key", pick(&args.access_key, &file.access_key))?;
    let secret_key = required("secret-key", pick(&args.secret_key, &file.secret_key))?;

    let url = non_empty(
        "url",
        pick(&args.url, &file.url).unwrap_or_else(|| defaults::URL.to_string()),
    )?;
    let indices = non_empty(
        "indices",
        pick(&args.indices, &file.indices).unwrap_or_else(|| defaults::INDICES.to_string()),
    )?;

    let repository_format = pick(&args.repository_format, &file.repository_format)
        .unwrap_or_else(|| defaults::REPOSITORY_FORMAT.to_string());
    validate_template("repository-format", &repository_format)?;

    let snapshot_format = pick(&args.snapshot_format, &file.snapshot_format)
        .unwrap_or_else(|| defaults::SNAPSHOT_FORMAT.to_string());
    validate_template("snapshot-format", &snapshot_format)?;

    let date_format = pick(&args.date_format, &file.date_format)
        .unwrap_or_else(|| defaults::DATE_FORMAT.to_string());
    validate_template("date-format", &date_format)?;

    let date = match pick(&args.date, &file.date) {
        Some(value) => parse_reference_date(&value, &date_format)?,
        None => today,
    };

    let request_timeout = match pick(&args.request_timeout, &file.request_timeout) {
        Some(value) => parse_duration("request-timeout", &value)?,
        None => http::REQUEST_TIMEOUT,
    };

    let retryable_status = args
        .retryable_status
        .or(file.retryable_status)
        .unwrap_or(http::RETRYABLE_STATUS);
    if !(100..=599).contains(&retryable_status) {
        return Err(ConfigError::InvalidValue {
            field: "retryable-status".to_string(),
            reason: format!("{} is not an HTTP status code", retryable_status),
        });
    }

    let restore = args.restore || file.restore.unwrap_or(false);
    let fail_on_poll_timeout = args.fail_on_poll_timeout || file.fail_on_poll_timeout.unwrap_or(false);
    let retry_rejections = !args.no_retry_rejections && file.retry_rejections.unwrap_or(true);

    let config = ResolvedConfig {
        service_name,
        env,
        url,
        indices,
        repository_format,
        snapshot_format,
        date,
        max_retries: args
            .max_retries
            .or(file.max_retries)
            .unwrap_or(defaults::MAX_RETRIES),
        retry_interval,
        retryable_status,
        retry_rejections,
        request_timeout,
        ignore_unavailable: args
            .ignore_unavailable
            .or(file.ignore_unavailable)
            .unwrap_or(defaults::IGNORE_UNAVAILABLE),
        include_global_state: args
            .include_global_state
            .or(file.include_global_state)
            .unwrap_or(defaults::INCLUDE_GLOBAL_STATE),
        mode: if restore { Mode::Restore } else { Mode::Backup },
        poll_timeout_policy: PollTimeoutPolicy::from_fail_flag(fail_on_poll_timeout),
        storage: StorageSettings {
            bucket,
            region,
            access_key,
            secret_key,
            compress: args.compress.or(file.compress).unwrap_or(defaults::COMPRESS),
        },
    };

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

fn pick(flag: &Option<String>, file: &Option<String>) -> Option<String> {
    flag.clone().or_else(|| file.clone())
}

fn required(field: &str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingRequired {
            field: field.to_string(),
        }),
    }
}

fn non_empty(field: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("failed to parse '{}': {}", value, e),
    })
}
