mod directory;
mod todo;

pub use directory::*;
pub use todo::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Access token with expiration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    pub expires: u64,
}

/// Device code information for OAuth flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCodeInfo {
    pub user_code: String,
    pub device_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
    pub message: String,
}

fn default_interval() -> u64 {
    5
}

/// Token storage keyed by resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenStore {
    #[serde(default)]
    pub tokens: std::collections::HashMap<String, AccessToken>,
}

impl TokenStore {
    pub fn get(&self, resource: &str) -> Option<&AccessToken> {
        self.tokens.get(resource)
    }

    pub fn insert(&mut self, resource: String, token: AccessToken) {
        self.tokens.insert(resource, token);
    }

    pub fn refresh_token(&self) -> Option<&AccessToken> {
        self.tokens.get("refresh_token")
    }
}

/// One page of an OData collection.
///
/// Graph uses `@odata.nextLink`, SharePoint with `odata=nometadata` uses
/// `odata.nextLink`.
#[derive(Debug, Clone, Deserialize)]
pub struct ODataPage {
    #[serde(default)]
    pub value: Vec<Value>,
    #[serde(rename = "@odata.nextLink")]
    pub graph_next_link: Option<String>,
    #[serde(rename = "odata.nextLink")]
    pub sharepoint_next_link: Option<String>,
}

impl ODataPage {
    pub fn next_link(&self) -> Option<&str> {
        self.graph_next_link
            .as_deref()
            .or(self.sharepoint_next_link.as_deref())
    }
}
