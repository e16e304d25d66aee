use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::{gen_token, get_epoch_s, IssuedTokens, ACCESS_TOKEN_ENV};
use crate::cache::TokenCache;
use crate::config::Config;
use crate::error::{CommandError, Result};
use crate::types::{AccessToken, ODataPage, TokenStore};

const ACCEPT_JSON: &str = "application/json;odata.metadata=none";
const ACCEPT_SHAREPOINT: &str = "application/json;odata=nometadata";

fn accept_for(url: &str) -> &'static str {
    if url.contains("/_api/") {
        ACCEPT_SHAREPOINT
    } else {
        ACCEPT_JSON
    }
}

/// Origin of a request URL, which is the resource its token must be issued for
pub fn resource_for(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|e| CommandError::validation(format!("Invalid URL {}: {}", url, e)))?;
    Ok(parsed.origin().ascii_serialization())
}

/// Cached sign-in: a refresh token plus access tokens per resource
pub struct Session {
    tokens: Mutex<TokenStore>,
    tenant: String,
    client_id: String,
    cache: TokenCache,
}

impl Session {
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        Self::with_cache(config, TokenCache::new()?)
    }

    pub fn with_cache(config: &Config, cache: TokenCache) -> anyhow::Result<Self> {
        let tokens = cache.read()?;
        Ok(Self {
            tokens: Mutex::new(tokens),
            tenant: config.auth.tenant.clone(),
            client_id: config.auth.client_id.clone(),
            cache,
        })
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens
            .lock()
            .await
            .refresh_token()
            .is_some_and(|t| t.expires >= get_epoch_s())
    }

    /// Store the tokens of a fresh sign-in under `resource`
    pub async fn store(&self, resource: &str, issued: IssuedTokens) -> Result<()> {
        let mut tokens = self.tokens.lock().await;
        tokens.tokens.clear();
        Self::insert(&mut tokens, resource, issued);
        self.save(&tokens)
    }

    /// Forget every cached token
    pub async fn clear(&self) -> Result<()> {
        self.tokens.lock().await.tokens.clear();
        self.cache
            .clear()
            .map_err(|e| CommandError::Auth(format!("{:#}", e)))
    }

    /// Cached, unexpired access token for `resource`, if any
    pub async fn cached_token(&self, resource: &str) -> Option<AccessToken> {
        self.tokens
            .lock()
            .await
            .get(resource)
            .filter(|t| t.expires >= get_epoch_s())
            .cloned()
    }

    /// Get or mint an access token for `resource`
    pub async fn access_token(&self, resource: &str) -> Result<String> {
        let refresh_token = {
            let tokens = self.tokens.lock().await;
            tokens.refresh_token().cloned()
        };

        let refresh_token = match refresh_token {
            Some(token) if token.expires < get_epoch_s() => {
                return Err(CommandError::Auth(
                    "Your sign-in has expired. Run 'm365 auth login' again.".to_string(),
                ))
            }
            Some(token) => token,
            None => {
                return Err(CommandError::Auth(
                    "Log in to Microsoft 365 first. Run 'm365 auth login'.".to_string(),
                ))
            }
        };

        if let Some(token) = self.cached_token(resource).await {
            return Ok(token.value);
        }

        debug!("Requesting access token for {}", resource);
        let issued = gen_token(&refresh_token, resource, &self.tenant, &self.client_id).await?;
        let value = issued.access_token.value.clone();
        {
            let mut tokens = self.tokens.lock().await;
            Self::insert(&mut tokens, resource, issued);
            self.save(&tokens)?;
        }

        Ok(value)
    }

    fn insert(tokens: &mut TokenStore, resource: &str, issued: IssuedTokens) {
        tokens.insert(resource.to_string(), issued.access_token);
        if let Some(refresh) = issued.refresh_token {
            tokens.insert("refresh_token".to_string(), refresh);
        }
    }

    fn save(&self, tokens: &TokenStore) -> Result<()> {
        self.cache
            .write(tokens)
            .map_err(|e| CommandError::Auth(format!("{:#}", e)))
    }
}

/// Where bearer tokens come from
pub enum Credentials {
    /// A token handed over as-is (environment variable or tests)
    Static(String),
    Session(Session),
}

impl Credentials {
    async fn access_token(&self, resource: &str) -> Result<String> {
        match self {
            Credentials::Static(token) => Ok(token.clone()),
            Credentials::Session(session) => session.access_token(resource).await,
        }
    }
}

/// Request helper every command sends its calls through
pub struct M365Client {
    http: Client,
    credentials: Credentials,
    graph_url: String,
}

impl M365Client {
    /// Create a client from configuration, preferring a token from the environment
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials = match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Credentials::Static(token.trim().to_string()),
            _ => Credentials::Session(Session::load(config)?),
        };
        Ok(Self::build(
            &config.api.graph_url,
            config.api.timeout,
            credentials,
        )?)
    }

    /// Create a client that always sends `token`
    pub fn with_token(graph_url: &str, token: &str) -> Result<Self> {
        Self::build(graph_url, 30, Credentials::Static(token.to_string()))
    }

    fn build(graph_url: &str, timeout: u64, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(timeout))
                .build()?,
            credentials,
            graph_url: graph_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute v1.0 Graph URL for `path`
    pub fn graph(&self, path: &str) -> String {
        format!("{}/v1.0/{}", self.graph_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, url: &str) -> Result<Value> {
        self.send(Method::GET, url, None).await
    }

    /// GET a collection and follow next links until every page is read
    pub async fn get_all(&self, url: &str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(url) = next {
            let page: ODataPage = serde_json::from_value(self.get(&url).await?)?;
            next = page.next_link().map(str::to_string);
            items.extend(page.value);
        }

        Ok(items)
    }

    pub async fn post<T: Serialize>(&self, url: &str, body: &T) -> Result<Value> {
        self.send(Method::POST, url, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn patch<T: Serialize>(&self, url: &str, body: &T) -> Result<Value> {
        self.send(Method::PATCH, url, Some(serde_json::to_value(body)?))
            .await
    }

    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value> {
        let token = self.credentials.access_token(&resource_for(url)?).await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| CommandError::Auth("Access token is not a valid header value".into()))?,
        );
        headers.insert(
            HeaderName::from_static("accept"),
            HeaderValue::from_static(accept_for(url)),
        );

        debug!("{} {}", method, url);
        let mut req = self.http.request(method.clone(), url);
        if let Some(body) = body {
            headers.insert(
                HeaderName::from_static("content-type"),
                HeaderValue::from_static("application/json"),
            );
            debug!("Request body: {}", body);
            req = req.body(body.to_string());
        }

        let res = req.headers(headers).send().await?;
        let status = res.status();
        let text = res.text().await?;
        debug!("{} {} -> {}", method, url, status);

        if !status.is_success() {
            return Err(CommandError::from_response(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}
