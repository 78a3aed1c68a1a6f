use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// On-disk configuration, normally `xenbuilder.toml` in the working
/// directory. A missing file is fine as long as the flags fill the gaps.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BuilderConfig {
    #[serde(default)]
    pub pool: PoolConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PoolConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl BuilderConfig {
    pub async fn load(path: &Path) -> Result<BuilderConfig> {
        if path.exists() {
            let content = fs::read_to_string(path).await?;
            let config: BuilderConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(BuilderConfig::default())
        }
    }
}

/// Fully resolved connection settings, after merging flags over the config
/// file. Flag values win; the password may also arrive via the
/// `XENBUILDER_PASSWORD` environment variable, which beats the file.
pub struct PoolConnection {
    pub url: Url,
    pub username: String,
    pub password: String,
}

impl PoolConnection {
    pub fn resolve(
        config: BuilderConfig,
        url: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<PoolConnection> {
        let url = url
            .or(config.pool.url)
            .ok_or_else(|| anyhow!("pool url is not configured, set --pool or pool.url"))?;
        let username = username
            .or(config.pool.username)
            .ok_or_else(|| anyhow!("pool user is not configured, set --pool-user or pool.username"))?;
        let password = password.or(config.pool.password).ok_or_else(|| {
            anyhow!(
                "pool password is not configured, set --pool-password, XENBUILDER_PASSWORD, or pool.password"
            )
        })?;
        Ok(PoolConnection {
            url: Url::parse(&url)?,
            username,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config() -> BuilderConfig {
        BuilderConfig {
            pool: PoolConfig {
                url: Some("https://pool.example.com".to_string()),
                username: Some("root".to_string()),
                password: Some("from-file".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn load_parses_pool_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xenbuilder.toml");
        tokio::fs::write(
            &path,
            "[pool]\nurl = \"https://pool.example.com\"\nusername = \"root\"\npassword = \"secret\"\n",
        )
        .await
        .unwrap();
        let config = BuilderConfig::load(&path).await.unwrap();
        assert_eq!(config.pool.url.as_deref(), Some("https://pool.example.com"));
        assert_eq!(config.pool.username.as_deref(), Some("root"));
        assert_eq!(config.pool.password.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn load_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuilderConfig::load(&dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert!(config.pool.url.is_none());
    }

    #[test]
    fn flags_override_file_values() {
        let connection = PoolConnection::resolve(
            file_config(),
            Some("https://other.example.com".to_string()),
            Some("admin".to_string()),
            Some("from-flag".to_string()),
        )
        .unwrap();
        assert_eq!(connection.url.as_str(), "https://other.example.com/");
        assert_eq!(connection.username, "admin");
        assert_eq!(connection.password, "from-flag");
    }

    #[test]
    fn file_values_fill_missing_flags() {
        let connection = PoolConnection::resolve(file_config(), None, None, None).unwrap();
        assert_eq!(connection.username, "root");
        assert_eq!(connection.password, "from-file");
    }

    #[test]
    fn missing_url_is_an_error() {
        let result = PoolConnection::resolve(
            BuilderConfig::default(),
            None,
            Some("root".to_string()),
            Some("secret".to_string()),
        );
        assert!(result.is_err());
    }
}
