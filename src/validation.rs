use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{CommandError, Result};

fn guid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("valid GUID pattern")
    })
}

fn channel_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^19:[0-9a-zA-Z_\-]+@thread\.(skype|tacv2)$").expect("valid channel id pattern")
    })
}

fn sharepoint_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^https://[a-z0-9\-]+(\.[a-z0-9\-]+)*\.sharepoint(-df)?\.(com|us|de|cn)(/|$)")
            .expect("valid SharePoint URL pattern")
    })
}

pub fn is_valid_guid(value: &str) -> bool {
    guid_regex().is_match(value)
}

pub fn is_valid_teams_channel_id(value: &str) -> bool {
    channel_id_regex().is_match(value)
}

pub fn is_valid_sharepoint_url(value: &str) -> bool {
    sharepoint_url_regex().is_match(value)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]` and RFC 3339 timestamps.
pub fn is_valid_iso_date_time(value: &str) -> bool {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return true;
    }
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}

pub fn require_guid(value: &str) -> Result<()> {
    if is_valid_guid(value) {
        Ok(())
    } else {
        Err(CommandError::validation(format!("{} is not a valid GUID", value)))
    }
}

pub fn require_iso_date_time(option: &str, value: &str) -> Result<()> {
    if is_valid_iso_date_time(value) {
        Ok(())
    } else {
        Err(CommandError::validation(format!(
            "{} is not a valid ISO date string for option {}",
            value, option
        )))
    }
}

pub fn require_one_of(value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CommandError::validation(format!(
            "{} is not a valid value. Allowed values are {}",
            value,
            allowed.join("|")
        )))
    }
}

/// Which of a mutually exclusive id/name option pair was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrName<'a> {
    Id(&'a str),
    Name(&'a str),
}

/// Require exactly one option of an id/name pair.
pub fn id_or_name<'a>(
    id: Option<&'a str>,
    name: Option<&'a str>,
    id_option: &str,
    name_option: &str,
) -> Result<IdOrName<'a>> {
    match (id, name) {
        (Some(id), None) => Ok(IdOrName::Id(id)),
        (None, Some(name)) => Ok(IdOrName::Name(name)),
        (Some(_), Some(_)) => Err(CommandError::validation(format!(
            "Specify either {} or {}, but not both",
            id_option, name_option
        ))),
        (None, None) => Err(CommandError::validation(format!(
            "Specify either {} or {}",
            id_option, name_option
        ))),
    }
}

/// Split a comma separated option value, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
