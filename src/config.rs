use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub roots: Roots,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Roots {
    #[serde(default = "default_roots")]
    pub allowed: Vec<PathBuf>,
}
impl Default for Roots {
    fn default() -> Self { Self { allowed: default_roots() } }
}
fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/mnt/roots/projects"), PathBuf::from("/mnt/roots/media")]
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}
impl Default for Server {
    fn default() -> Self { Self { bind_addr: default_bind_addr(), port: default_port() } }
}
fn default_bind_addr() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Origins allowed to call the API from a browser context. Empty disables CORS.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Cors {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}
impl Default for Limits {
    fn default() -> Self { Self { requests_per_second: default_rps(), burst: default_burst() } }
}
fn default_rps() -> u32 { 50 }
fn default_burst() -> u32 { 100 }

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Log {
    #[serde(default)]
    pub format: LogFormat,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.roots.allowed.is_empty() { anyhow::bail!("roots.allowed must not be empty"); }
        for root in &self.roots.allowed {
            if !root.is_absolute() {
                anyhow::bail!("allowed root must be absolute: {}", root.display());
            }
        }
        if self.server.bind_addr.trim().is_empty() { anyhow::bail!("bind_addr must not be empty"); }
        // ephemeral ports only make sense on loopback
        if self.server.port == 0 && !is_loopback(&self.server.bind_addr) {
            anyhow::bail!("port must be > 0 when binding {}", self.server.bind_addr);
        }
        if self.limits.requests_per_second == 0 { anyhow::bail!("requests_per_second must be > 0"); }
        if self.limits.burst == 0 { anyhow::bail!("burst must be > 0"); }
        Ok(())
    }
}

fn is_loopback(bind_addr: &str) -> bool {
    match bind_addr.trim().parse::<std::net::IpAddr>() {
        Ok(ip) => ip.is_loopback(),
        Err(_) => bind_addr.trim() == "localhost",
    }
}
