use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::types::TokenStore;

const TOKENS_FILE: &str = "tokens.json";

/// On-disk home of the sign-in tokens
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Token cache in the user cache directory
    pub fn new() -> Result<Self> {
        Self::in_dir(Config::cache_dir()?)
    }

    pub fn in_dir(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", dir))?;
        Ok(Self {
            path: dir.join(TOKENS_FILE),
        })
    }

    /// Stored tokens; empty when nobody has signed in
    pub fn read(&self) -> Result<TokenStore> {
        if !self.path.exists() {
            return Ok(TokenStore::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token cache: {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse token cache: {:?}", self.path))
    }

    pub fn write(&self, tokens: &TokenStore) -> Result<()> {
        let content = serde_json::to_string_pretty(tokens).context("Failed to serialize tokens")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write token cache: {:?}", self.path))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete token cache: {:?}", self.path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessToken;

    #[test]
    fn test_write_read_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::in_dir(dir.path().join("nested")).unwrap();

        assert!(cache.read().unwrap().refresh_token().is_none());

        let mut store = TokenStore::default();
        store.insert(
            "refresh_token".to_string(),
            AccessToken {
                value: "abc".to_string(),
                expires: 42,
            },
        );
        cache.write(&store).unwrap();

        let loaded = cache.read().unwrap();
        assert_eq!(loaded.refresh_token().map(|t| t.value.as_str()), Some("abc"));

        cache.clear().unwrap();
        assert!(cache.read().unwrap().refresh_token().is_none());
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::in_dir(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join(TOKENS_FILE), "{").unwrap();

        assert!(cache.read().is_err());
    }
}
