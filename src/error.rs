use serde_json::Value;
use thiserror::Error;

/// The single error kind every command reports through.
///
/// Display is always the bare message so that validation, lookup and
/// remote failures all print the same way.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Bad option value or combination, raised before any request is sent
    #[error("{0}")]
    Validation(String),

    /// A named resource did not resolve to exactly one item
    #[error("{0}")]
    NotFound(String),

    /// The remote API answered with a failure
    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing `.m365rc.json` failed
    #[error("{0}")]
    Context(String),

    #[error("{0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build a remote error from a failed response body.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Remote(odata_error_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        }))
    }
}

/// Extract the human readable message from a Graph or SharePoint error body.
///
/// Handles the shapes both services return:
/// `{"odata.error": {"message": {"value": ..}}}`,
/// `{"error": {"message": ".."}}`, `{"error": {"message": {"value": ..}}}`,
/// `{"error": {"odata.error": ..}}` and OAuth's `error_description`.
pub fn odata_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    message_from_value(&json)
}

fn message_from_value(json: &Value) -> Option<String> {
    if let Some(odata) = json.get("odata.error") {
        return message_field(odata.get("message")?);
    }

    if let Some(error) = json.get("error") {
        if error.get("odata.error").is_some() {
            return message_from_value(error);
        }
        if let Some(message) = error.get("message").and_then(message_field) {
            return Some(message);
        }
        if let Some(text) = error.as_str() {
            return Some(
                json.get("error_description")
                    .and_then(|d| d.as_str())
                    .unwrap_or(text)
                    .to_string(),
            );
        }
    }

    json.get("error_description")
        .and_then(|d| d.as_str())
        .map(str::to_string)
}

fn message_field(message: &Value) -> Option<String> {
    match message {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("value").and_then(|v| v.as_str()).map(str::to_string),
        _ => None,
    }
}
