use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_states_url")]
    pub states_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_allowed_origins() -> Vec<String> { vec!["*".to_string()] }
fn default_states_url() -> String { "https://opensky-network.org/api/states/all".to_string() }
fn default_user_agent() -> String { format!("flight-insights/{}", env!("CARGO_PKG_VERSION")) }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            states_url: default_states_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address: {}:{}", self.bind_address, self.port))
    }

    /// True when any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Basic-auth credentials for the upstream states API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub config_path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub credentials: Option<Credentials>,
}

impl Config {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment variables take precedence over the file
    pub fn apply_env(mut self, env: &EnvConfig) -> Self {
        if let Some(host) = &env.host {
            self.server.bind_address = host.clone();
        }
        if let Some(port) = env.port {
            self.server.port = port;
        }
        self
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
            ),
            None => None,
        };

        let credentials = match (lookup("OPENSKY_USERNAME"), lookup("OPENSKY_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Ok(Self {
            config_path: lookup("CONFIG_PATH"),
            host: lookup("HOST"),
            port,
            credentials,
        })
    }

    pub fn config_path(&self) -> &str {
        self.config_path.as_deref().unwrap_or("config.toml")
    }
}
