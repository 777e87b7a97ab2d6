// File: src/config.rs
// Purpose: Configuration parsing from vitrine.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vitrine_validation::PasswordPolicy;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub uploads: UploadsConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Site metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Where a successful login lands when no return URL was given
    #[serde(default = "default_home")]
    pub home: String,
}

/// Authentication and password settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Cookie carrying the session token
    #[serde(default = "default_auth_cookie")]
    pub auth_cookie: String,

    /// Cookie carrying the one-shot flash message
    #[serde(default = "default_message_cookie")]
    pub message_cookie: String,

    #[serde(default)]
    pub password: PasswordPolicy,
}

/// Upload destinations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_product_images_dir")]
    pub product_images_dir: PathBuf,
}

/// Snapshot file used by the in-memory store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

// Default values
fn default_name() -> String {
    "Vitrine".to_string()
}

fn default_home() -> String {
    "/".to_string()
}

fn default_auth_cookie() -> String {
    "auth_token".to_string()
}

fn default_message_cookie() -> String {
    "mensagem".to_string()
}

fn default_product_images_dir() -> PathBuf {
    PathBuf::from("static/img/produtos")
}

fn default_store_path() -> PathBuf {
    PathBuf::from("vitrine.json")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            home: default_home(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            auth_cookie: default_auth_cookie(),
            message_cookie: default_message_cookie(),
            password: PasswordPolicy::default(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            product_images_dir: default_product_images_dir(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.site.name, "Vitrine");
        assert_eq!(config.site.home, "/");
        assert_eq!(config.security.auth_cookie, "auth_token");
        assert_eq!(config.security.password.min_length, 8);
        assert_eq!(
            config.uploads.product_images_dir,
            PathBuf::from("static/img/produtos")
        );
        assert_eq!(config.store.path, PathBuf::from("vitrine.json"));
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.security.message_cookie, "mensagem");
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [security.password]
            min_length = 12

            [uploads]
            product_images_dir = "public/produtos"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.security.password.min_length, 12);
        assert_eq!(config.security.auth_cookie, "auth_token");
        assert_eq!(
            config.uploads.product_images_dir,
            PathBuf::from("public/produtos")
        );
        assert_eq!(config.site.name, "Vitrine");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.path, PathBuf::from("vitrine.json"));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitrine.toml");
        fs::write(&path, "[site\nname = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse config file"));
    }
}
