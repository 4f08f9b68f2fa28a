// File: snapshotter/src/naming.rs
//! Repository and snapshot naming.
//!
//! Names are the reference date rendered through strftime templates, so
//! re-running for the same date addresses the same repository and snapshot
//! instead of creating duplicates. With the defaults a month maps to one
//! repository (`%Y%m` → `202501`) holding one snapshot per day (`%d` → `15`).

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

use crate::config::ResolvedConfig;
use crate::errors::ConfigError;

pub fn repository_name(config: &ResolvedConfig) -> String {
    format_date(&config.date, &config.repository_format)
}

pub fn snapshot_name(config: &ResolvedConfig) -> String {
    format_date(&config.date, &config.snapshot_format)
}

/// `service/env/repository` prefix inside the bucket
pub fn base_path(config: &ResolvedConfig) -> String {
    format!(
        "{}/{}/{}",
        config.service_name,
        config.env,
        repository_name(config)
    )
}

/// Templates reaching this point were checked by [`validate_template`].
pub fn format_date(date: &NaiveDateTime, template: &str) -> String {
    date.format(template).to_string()
}

/// Reject empty templates, unknown specifiers, and specifiers a plain date
/// cannot render (time zones).
pub fn validate_template(field: &str, template: &str) -> Result<(), ConfigError> {
    if template.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "template must not be empty".to_string(),
        });
    }

    if StrftimeItems::new(template).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a valid strftime template", template),
        });
    }

    let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "probe date out of range".to_string(),
        })?;

    let mut rendered = String::new();
    if write!(rendered, "{}", probe.format(template)).is_err() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' cannot be rendered from a date without time zone", template),
        });
    }

    Ok(())
}

/// Parse `--date` with `--date-format`. Date-only formats resolve to midnight.
pub fn parse_reference_date(value: &str, format: &str) -> Result<NaiveDateTime, ConfigError> {
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
        return Ok(date_time);
    }

    NaiveDate::parse_from_str(value, format)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|e| ConfigError::InvalidValue {
            field: "date".to_string(),
            reason: format!("'{}' does not match format '{}': {}", value, format, e),
        })
}
