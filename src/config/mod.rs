use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

mod defaults;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Auth endpoint returning the session identity token.
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Route to navigate to when the token cannot be loaded.
    #[serde(default = "defaults::login_route")]
    pub login_route: String,

    /// Request timeout, in seconds.
    #[serde(default = "defaults::timeout")]
    pub timeout: u64,

    /// Session cookies sent with the token request.
    #[serde(default = "defaults::empty_map")]
    pub cookies: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            login_route: defaults::login_route(),
            timeout: defaults::timeout(),
            cookies: defaults::empty_map(),
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "dashboard.toml";

    /// Load config from `path`, or from the default location when `None`.
    /// A missing file is not an error, defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => PathBuf::from(path),
            None => Self::default_path()?,
        };

        let mut cfg: Config = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config file '{}' toml", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file '{}' not found, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config file '{}'", path.display()))
            }
        };

        cfg.complete().context("validate config")?;
        Ok(cfg)
    }

    pub fn complete(&mut self) -> Result<()> {
        self.endpoint = expandenv("endpoint", &self.endpoint)?;
        if self.endpoint.is_empty() {
            bail!("endpoint cannot be empty");
        }

        self.login_route = expandenv("login_route", &self.login_route)?;
        if !self.login_route.starts_with('/') {
            bail!(
                "login_route should start with '/', found '{}'",
                self.login_route
            );
        }

        if self.timeout == 0 || self.timeout > 300 {
            bail!("timeout should be in range [1,300], found {}", self.timeout);
        }

        for (name, value) in self.cookies.iter_mut() {
            if name.is_empty() {
                bail!("cookie name cannot be empty");
            }
            *value = expandenv(name, &*value)?;
        }

        Ok(())
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    fn default_path() -> Result<PathBuf> {
        if let Ok(dir) = env::var("DASHBOARD_CONFIG") {
            return Ok(PathBuf::from(dir).join(Self::FILE_NAME));
        }

        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        match home {
            Some(home) => Ok(home.join(".config").join("dashboard").join(Self::FILE_NAME)),
            None => {
                bail!("could not determine home directory, please specify config path manually")
            }
        }
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}
