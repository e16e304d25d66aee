use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Deserialize;

use super::LOGIN_URL;
use crate::error::{odata_error_message, CommandError, Result};
use crate::types::{AccessToken, DeviceCodeInfo};

/// Refresh tokens issued to public clients live for 90 days
const REFRESH_TOKEN_LIFETIME_S: u64 = 90 * 24 * 60 * 60;

/// Renew access tokens slightly before they actually expire
const EXPIRY_MARGIN_S: u64 = 60;

pub fn get_epoch_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Tokens issued by the token endpoint
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: AccessToken,
    pub refresh_token: Option<AccessToken>,
}

impl TokenResponse {
    fn into_issued(self) -> IssuedTokens {
        let now = get_epoch_s();
        IssuedTokens {
            access_token: AccessToken {
                value: self.access_token,
                expires: now + self.expires_in.saturating_sub(EXPIRY_MARGIN_S),
            },
            refresh_token: self.refresh_token.map(|value| AccessToken {
                value,
                expires: now + REFRESH_TOKEN_LIFETIME_S,
            }),
        }
    }
}

/// Outcome of one device code poll
#[derive(Debug)]
pub enum DeviceCodePoll {
    /// The user has not finished signing in yet
    Pending,
    Authorized(IssuedTokens),
}

fn form_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("content-type"),
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers
}

fn scope_for(resource: &str) -> String {
    format!("{}/.default offline_access", resource.trim_end_matches('/'))
}

/// Start the device code flow
pub async fn gen_device_code(
    tenant_id: &str,
    client_id: &str,
    resource: &str,
) -> Result<DeviceCodeInfo> {
    let url = format!("{}/{}/oauth2/v2.0/devicecode", LOGIN_URL, tenant_id);
    let body = format!(
        "client_id={}&scope={}",
        urlencoding::encode(client_id),
        urlencoding::encode(&scope_for(resource))
    );

    let res = Client::new()
        .post(&url)
        .headers(form_headers())
        .body(body)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(CommandError::Auth(format!(
            "Failed to generate device code: {}",
            odata_error_message(&text).unwrap_or_else(|| format!("{} - {}", status, text))
        )));
    }

    serde_json::from_str(&text).map_err(|e| {
        CommandError::Auth(format!("Failed to parse device code response: {}", e))
    })
}

/// Poll the token endpoint once for a pending device code
pub async fn poll_device_code(
    device_code: &str,
    tenant_id: &str,
    client_id: &str,
) -> Result<DeviceCodePoll> {
    let url = format!("{}/{}/oauth2/v2.0/token", LOGIN_URL, tenant_id);
    let body = format!(
        "client_id={}&device_code={}&grant_type=urn:ietf:params:oauth:grant-type:device_code",
        urlencoding::encode(client_id),
        urlencoding::encode(device_code)
    );

    let res = Client::new()
        .post(&url)
        .headers(form_headers())
        .body(body)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    if status.is_success() {
        let tokens: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| CommandError::Auth(format!("Failed to parse token response: {}", e)))?;
        return Ok(DeviceCodePoll::Authorized(tokens.into_issued()));
    }

    if text.contains("authorization_pending") || text.contains("slow_down") {
        return Ok(DeviceCodePoll::Pending);
    }

    Err(CommandError::Auth(
        odata_error_message(&text).unwrap_or_else(|| format!("{} - {}", status, text)),
    ))
}

/// Redeem a refresh token for an access token to `resource`
pub async fn gen_token(
    refresh_token: &AccessToken,
    resource: &str,
    tenant_id: &str,
    client_id: &str,
) -> Result<IssuedTokens> {
    let url = format!("{}/{}/oauth2/v2.0/token", LOGIN_URL, tenant_id);
    let body = format!(
        "client_id={}&scope={}&grant_type=refresh_token&refresh_token={}",
        urlencoding::encode(client_id),
        urlencoding::encode(&scope_for(resource)),
        urlencoding::encode(&refresh_token.value)
    );

    let res = Client::new()
        .post(&url)
        .headers(form_headers())
        .body(body)
        .send()
        .await?;

    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(CommandError::Auth(format!(
            "Failed to get access token for {}: {}",
            resource,
            odata_error_message(&text).unwrap_or_else(|| format!("{} - {}", status, text))
        )));
    }

    let tokens: TokenResponse = serde_json::from_str(&text)
        .map_err(|e| CommandError::Auth(format!("Failed to parse token response: {}", e)))?;
    Ok(tokens.into_issued())
}

/// Claims of interest from an access token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    pub upn: Option<String>,
    pub unique_name: Option<String>,
    pub tid: Option<String>,
    pub app_displayname: Option<String>,
    pub exp: Option<u64>,
}

impl TokenClaims {
    pub fn user(&self) -> Option<&str> {
        self.upn.as_deref().or(self.unique_name.as_deref())
    }
}

/// Read the payload of a JWT without verifying it
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    use base64::Engine;

    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
