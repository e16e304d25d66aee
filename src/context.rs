//! Project-local context stored in `.m365rc.json`.
//!
//! The file holds a `context` object whose entries are option values saved
//! for the current directory. Other top-level keys are left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CommandError, Result};

pub const CONTEXT_FILE: &str = ".m365rc.json";
const CONTEXT_KEY: &str = "context";

/// `.m365rc.json` in the working directory
pub fn context_path() -> PathBuf {
    PathBuf::from(CONTEXT_FILE)
}

fn read_error(err: impl std::fmt::Display) -> CommandError {
    CommandError::Context(format!(
        "Error reading {}: {}. Please add context info to {} manually.",
        CONTEXT_FILE, err, CONTEXT_FILE
    ))
}

fn write_error(err: impl std::fmt::Display) -> CommandError {
    CommandError::Context(format!(
        "Error writing {}: {}. Please add context info to {} manually.",
        CONTEXT_FILE, err, CONTEXT_FILE
    ))
}

/// File contents, or `None` when the file does not exist
fn read(path: &Path) -> Result<Option<Map<String, Value>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(read_error)?;
    match serde_json::from_str::<Value>(&contents).map_err(read_error)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(read_error("file does not contain a JSON object")),
    }
}

fn write(path: &Path, contents: &Map<String, Value>) -> Result<()> {
    let json = serde_json::to_string_pretty(contents).map_err(write_error)?;
    fs::write(path, json).map_err(write_error)
}

/// Add `info` as the context unless the file already has one.
pub fn save_context_info(path: &Path, info: &Map<String, Value>) -> Result<()> {
    let mut contents = read(path)?.unwrap_or_default();
    if contents.contains_key(CONTEXT_KEY) {
        debug!("{} already contains context info", CONTEXT_FILE);
        return Ok(());
    }

    contents.insert(CONTEXT_KEY.to_string(), Value::Object(info.clone()));
    write(path, &contents)
}

/// Drop the context; the file goes away when nothing else is left in it.
///
/// Returns whether there was a context to remove.
pub fn remove_context(path: &Path) -> Result<bool> {
    let Some(mut contents) = read(path)? else {
        return Ok(false);
    };
    if contents.remove(CONTEXT_KEY).is_none() {
        return Ok(false);
    }

    if contents.is_empty() {
        fs::remove_file(path).map_err(|e| {
            CommandError::Context(format!("Error removing {}: {}", CONTEXT_FILE, e))
        })?;
    } else {
        write(path, &contents)?;
    }
    Ok(true)
}

/// Saved context options; empty when there is no context
pub fn context_options(path: &Path) -> Result<Map<String, Value>> {
    Ok(read(path)?
        .and_then(|mut contents| contents.remove(CONTEXT_KEY))
        .and_then(|context| match context {
            Value::Object(options) => Some(options),
            _ => None,
        })
        .unwrap_or_default())
}

/// Set one context option, creating the context if needed
pub fn set_context_option(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut contents = read(path)?.unwrap_or_default();
    let context = contents
        .entry(CONTEXT_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    match context {
        Value::Object(options) => {
            options.insert(name.to_string(), Value::String(value.to_string()));
        }
        _ => return Err(read_error("context is not a JSON object")),
    }
    write(path, &contents)
}

pub fn remove_context_option(path: &Path, name: &str) -> Result<()> {
    let mut contents = read(path)?.unwrap_or_default();
    let removed = contents
        .get_mut(CONTEXT_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|options| options.remove(name));

    if removed.is_none() {
        return Err(CommandError::Context(format!(
            "There is no option {} in the context info",
            name
        )));
    }
    write(path, &contents)
}
