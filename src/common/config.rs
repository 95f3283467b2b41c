use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CONFIG_FILE: &str = "cliprelay.toml";
pub const ENV_PREFIX: &str = "CLIPRELAY_";

/// Relay server configuration.
/// Layered: defaults < toml file < CLIPRELAY_* env < PORT env < cli flags
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Root directory holding one subdirectory per session
    pub upload_root: PathBuf,
    /// Static front-end, served as router fallback when present
    pub public_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Used when the uploaded clip's original filename has no usable extension
    pub default_extension: String,
    /// Honor X-Forwarded-* headers when building session links
    pub trust_proxy: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            upload_root: PathBuf::from("uploads"),
            public_dir: Some(PathBuf::from("public")),
            max_upload_bytes: 100 * 1024 * 1024, // 100 MB
            default_extension: ".webm".to_string(),
            trust_proxy: false,
        }
    }
}

impl RelayConfig {
    /// Load config from an optional toml file plus environment.
    ///
    /// When `file` is `None` the default `cliprelay.toml` is read if it
    /// exists in the working directory; an explicitly named file must exist.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(RelayConfig::default()));

        match file {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                figment = figment.merge(Toml::file(path));
            }
            None => figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        }

        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX)).merge(Env::raw().only(&["PORT"])))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: RelayConfig = figment.extract().context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload_root.as_os_str().is_empty() {
            anyhow::bail!("upload_root must not be empty");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than zero");
        }
        if !self.default_extension.starts_with('.') || self.default_extension.len() < 2 {
            anyhow::bail!(
                "default_extension must look like \".ext\", got {:?}",
                self.default_extension
            );
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
