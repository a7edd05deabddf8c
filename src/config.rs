use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://api.elliemae.com";
pub const DEFAULT_UPLOAD_DIR: &str = "/home/ec2-user/uploaded_files";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// Encompass API credentials and client settings.
///
/// Read once at startup and never reloaded.
#[derive(Clone, Deserialize)]
pub struct EncompassConfig {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
    pub instance_id: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for EncompassConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncompassConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("instance_id", &self.instance_id)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Load `.env` into the process environment, if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the server settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|| (50 * 1024 * 1024).to_string())
                .parse()?,
        })
    }
}

impl EncompassConfig {
    /// Only the commands that talk to Encompass load this; the ingress runs without it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the Encompass settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("{} must be set", key))
        };

        Ok(Self {
            username: required("ENCOMPASS_USERNAME")?,
            password: required("ENCOMPASS_PASSWORD")?,
            client_id: required("ENCOMPASS_CLIENTID")?,
            client_secret: required("ENCOMPASS_CLIENTSECRET")?,
            instance_id: required("ENCOMPASS_INSTANCE")?,
            api_base: lookup("ENCOMPASS_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_secs: lookup("ENCOMPASS_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()?,
        })
    }
}
