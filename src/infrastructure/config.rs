use url::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "olaris.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub site_url: String,
    pub contact_endpoint: String,
    pub newsletter_path: String,
    /// Zero disables the request timeout.
    pub request_timeout_secs: u64,
    pub contact_status_secs: Option<u64>,
    pub newsletter_status_secs: Option<u64>,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_url: "https://olaris.co.uk".into(),
            contact_endpoint: "https://formspree.io/f/mqaqazog".into(),
            newsletter_path: "/api/newsletter".into(),
            request_timeout_secs: 30,
            contact_status_secs: None,
            newsletter_status_secs: Some(5),
            log_file: PathBuf::from("olaris.log"),
            log_level: "info".into(),
        }
    }
}

/// Fully resolved submission targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub contact: String,
    pub newsletter: String,
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn contact_status_window(&self) -> Option<Duration> {
        self.contact_status_secs.map(Duration::from_secs)
    }

    pub fn newsletter_status_window(&self) -> Option<Duration> {
        self.newsletter_status_secs.map(Duration::from_secs)
    }

    /// Resolves the newsletter path against the site url; the contact endpoint must be absolute.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let contact = parse_url(&self.contact_endpoint)?;
        let site = parse_url(&self.site_url)?;
        let newsletter = site
            .join(&self.newsletter_path)
            .map_err(|source| ConfigError::InvalidUrl {
                url: self.newsletter_path.clone(),
                source,
            })?;

        Ok(Endpoints {
            contact: contact.to_string(),
            newsletter: newsletter.to_string(),
        })
    }

    /// Applies `OLARIS_*` overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OLARIS_SITE_URL") {
            self.site_url = v;
        }
        if let Some(v) = lookup("OLARIS_CONTACT_ENDPOINT") {
            self.contact_endpoint = v;
        }
        if let Some(v) = lookup("OLARIS_NEWSLETTER_PATH") {
            self.newsletter_path = v;
        }
        if let Some(v) = lookup("OLARIS_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "OLARIS_REQUEST_TIMEOUT_SECS",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("OLARIS_LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Reads settings from `path`, or from `olaris.toml` when no path is given.
///
/// An explicit path must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Settings::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}
