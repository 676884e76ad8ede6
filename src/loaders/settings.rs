//! Loader settings.
//!
//! `LoaderSettings` is read with the `config` crate from an optional file
//! plus `MULLIGAN_*` environment variables:
//!
//! | variable                        | field                 |
//! |---------------------------------|-----------------------|
//! | `MULLIGAN_ARCHIDEKT_BASE`       | `archidekt_base`      |
//! | `MULLIGAN_MOXFIELD_BASE`        | `moxfield_base`       |
//! | `MULLIGAN_TOPDECK_BASE`         | `topdeck_base`        |
//! | `MULLIGAN_EDHTOP16_BASE`        | `edhtop16_base`       |
//! | `MULLIGAN_TOPDECK_API_KEY`      | `topdeck_api_key`     |
//! | `MULLIGAN_MOXFIELD_USER_AGENT`  | `moxfield_user_agent` |
//! | `MULLIGAN_MOXFIELD_API_KEY`     | `moxfield_api_key`    |
//! | `MULLIGAN_CLIENT_HOST`          | `client_host`         |
//!
//! Configured bases go through `resolve_proxy_base`, so a local client only
//! ever talks to local proxies.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::decklist::DeckSource;
use crate::error::Result;

pub const ARCHIDEKT_UPSTREAM: &str = "https://archidekt.com";
pub const MOXFIELD_UPSTREAM: &str = "https://api2.moxfield.com";
pub const TOPDECK_UPSTREAM: &str = "https://topdeck.gg/api";
pub const EDHTOP16_UPSTREAM: &str = "https://edhtop16.com/api";

pub const DEFAULT_USER_AGENT: &str = concat!("mulligan-tool/", env!("CARGO_PKG_VERSION"));

const ENV_PREFIX: &str = "MULLIGAN";
const LOCAL_HOSTNAMES: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// Settings shared by every loader.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub archidekt_base: Option<String>,
    pub moxfield_base: Option<String>,
    pub topdeck_base: Option<String>,
    pub edhtop16_base: Option<String>,
    pub topdeck_api_key: Option<String>,
    pub moxfield_user_agent: Option<String>,
    pub moxfield_api_key: Option<String>,
    /// Hostname the requests originate from; decides which bases are trusted.
    pub client_host: Option<String>,
}

impl LoaderSettings {
    /// Read settings from `path` (if given and present) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like `load`, but reading variables from `env` instead of the process
    /// environment when it is `Some`.
    pub fn load_with_env(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .build()?
            .try_deserialize()?;

        tracing::debug!(
            client_host = settings.client_host.as_deref().unwrap_or(""),
            topdeck_key = settings.topdeck_api_key.is_some(),
            "loaded loader settings"
        );
        Ok(settings)
    }

    #[must_use]
    pub fn with_client_host(mut self, host: impl Into<String>) -> Self {
        self.client_host = Some(host.into());
        self
    }

    fn resolve(&self, configured: Option<&String>, fallback: &str) -> String {
        resolve_proxy_base(configured.map(String::as_str), fallback, self.client_host.as_deref())
    }

    /// Request options for one deck service.
    #[must_use]
    pub fn options_for(&self, source: DeckSource) -> LoadOptions {
        match source {
            DeckSource::Archidekt => LoadOptions::new(self.resolve(self.archidekt_base.as_ref(), ARCHIDEKT_UPSTREAM)),
            DeckSource::Moxfield => {
                let user_agent = self.moxfield_user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
                let mut options = LoadOptions::new(self.resolve(self.moxfield_base.as_ref(), MOXFIELD_UPSTREAM))
                    .with_header("User-Agent", user_agent);
                if let Some(key) = &self.moxfield_api_key {
                    options = options.with_header("x-moxfield-key", key.as_str());
                }
                options
            }
            DeckSource::TopDeck => {
                let mut options = LoadOptions::new(self.resolve(self.topdeck_base.as_ref(), TOPDECK_UPSTREAM));
                options.api_key = self.topdeck_api_key.clone();
                options
            }
        }
    }

    /// Base URL of the EDHTop16 API.
    #[must_use]
    pub fn edhtop16_base(&self) -> String {
        self.resolve(self.edhtop16_base.as_ref(), EDHTOP16_UPSTREAM)
    }
}

/// Per-request loader options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Service base: an absolute URL or a proxy path.
    pub api_base: String,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// TopDeck `Authorization` value.
    pub api_key: Option<String>,
}

impl LoadOptions {
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            headers: Vec::new(),
            api_key: None,
        }
    }

    /// Public upstream for `source`, no extra headers.
    #[must_use]
    pub fn upstream(source: DeckSource) -> Self {
        LoaderSettings::default().options_for(source)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// `api_base` without trailing slashes.
    #[must_use]
    pub fn clean_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}

/// Pick the base URL a client should use.
///
/// No configured value gives `fallback`. A non-local (or unknown) client
/// gets the configured value. A local client only accepts a path starting
/// with `/` or an absolute URL pointing at a local host; anything else
/// falls back.
///
/// ```
/// use mulligan_tool::loaders::resolve_proxy_base;
///
/// assert_eq!(resolve_proxy_base(None, "/api/x", Some("localhost")), "/api/x");
/// assert_eq!(resolve_proxy_base(Some("https://proxy.example"), "/api/x", Some("deck.example")), "https://proxy.example");
/// assert_eq!(resolve_proxy_base(Some("https://proxy.example"), "/api/x", Some("localhost")), "/api/x");
/// assert_eq!(resolve_proxy_base(Some("http://127.0.0.1:8080"), "/api/x", Some("localhost")), "http://127.0.0.1:8080");
/// ```
#[must_use]
pub fn resolve_proxy_base(configured: Option<&str>, fallback: &str, client_host: Option<&str>) -> String {
    let Some(configured) = configured.filter(|value| !value.is_empty()) else {
        return fallback.to_string();
    };
    if !client_host.is_some_and(is_local_host) {
        return configured.to_string();
    }
    if configured.starts_with('/') || is_local_absolute_url(configured) {
        return configured.to_string();
    }
    fallback.to_string()
}

/// Loopback names and private IPv4 ranges.
#[must_use]
pub fn is_local_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if LOCAL_HOSTNAMES.contains(&host) {
        return true;
    }
    if let Ok(v4) = host.parse::<Ipv4Addr>() {
        return v4.is_private() || v4.is_loopback();
    }
    host.parse::<Ipv6Addr>().is_ok_and(|v6| v6.is_loopback())
}

fn is_local_absolute_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    reqwest::Url::parse(value)
        .ok()
        .and_then(|url| url.host_str().map(is_local_host))
        .unwrap_or(false)
}
