//! Process configuration read from the environment at startup.
//!
//! | Variable            | Default                                    |
//! |---------------------|--------------------------------------------|
//! | `TODO_HOST`         | `0.0.0.0`                                  |
//! | `TODO_PORT`         | `6969`                                     |
//! | `TODO_BACKEND`      | `remote` if `TODO_UPSTREAM_URL` is set, else `memory` |
//! | `TODO_UPSTREAM_URL` | required for `remote`                      |
//! | `TODO_UPSTREAM_KEY` | required for `remote`                      |
//!
//! Empty values count as unset.

use thiserror::Error;

pub const HOST_VAR: &str = "TODO_HOST";
pub const PORT_VAR: &str = "TODO_PORT";
pub const BACKEND_VAR: &str = "TODO_BACKEND";
pub const UPSTREAM_URL_VAR: &str = "TODO_UPSTREAM_URL";
pub const UPSTREAM_KEY_VAR: &str = "TODO_UPSTREAM_KEY";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 6969;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TODO_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("unknown TODO_BACKEND {0:?}, expected \"memory\" or \"remote\"")]
    UnknownBackend(String),

    #[error("{0} is required for the remote backend")]
    Missing(&'static str),
}

/// Which store answers the todo routes.
#[derive(Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Remote { base_url: String, api_key: String },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Memory => "memory",
            Backend::Remote { .. } => "remote",
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Memory => f.write_str("Memory"),
            Backend::Remote { base_url, .. } => f
                .debug_struct("Remote")
                .field("base_url", base_url)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = get(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let upstream_url = get(UPSTREAM_URL_VAR);
        let backend = match get(BACKEND_VAR).map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(name) if name == "memory" => Backend::Memory,
            Some(name) if name == "remote" => remote(upstream_url, get(UPSTREAM_KEY_VAR))?,
            Some(other) => return Err(ConfigError::UnknownBackend(other)),
            None if upstream_url.is_some() => remote(upstream_url, get(UPSTREAM_KEY_VAR))?,
            None => Backend::Memory,
        };

        Ok(Self {
            host,
            port,
            backend,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn remote(base_url: Option<String>, api_key: Option<String>) -> Result<Backend, ConfigError> {
    Ok(Backend::Remote {
        base_url: base_url.ok_or(ConfigError::Missing(UPSTREAM_URL_VAR))?,
        api_key: api_key.ok_or(ConfigError::Missing(UPSTREAM_KEY_VAR))?,
    })
}
