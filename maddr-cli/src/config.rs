//! Load config from file and environment; CLI flags override both.

use clap::ValueEnum;
use serde::Deserialize;
use std::path::PathBuf;

/// How addresses are printed, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum OutputFormat {
    /// Slash-delimited text form.
    String,
    /// Raw canonical bytes.
    Bytes,
    /// 0x-prefixed lowercase hex of the canonical bytes.
    Hex,
    /// Byte values as a debug list.
    Slice,
}

impl OutputFormat {
    fn from_name(s: &str) -> Option<Self> {
        OutputFormat::from_str(s, true).ok()
    }
}

/// Tool configuration. File: ~/.config/maddr/config.toml or
/// /etc/maddr/config.toml. Env overrides: MADDR_FORMAT,
/// MADDR_HIDE_LOOPBACK, MADDR_LOOKUP_URL, MADDR_LOOKUP_TIMEOUT_SECS.
#[derive(Debug, Clone)]
pub struct Config {
    pub format: OutputFormat,
    pub hide_loopback: bool,
    /// Service answering a GET with the caller's IP as plain text.
    pub lookup_url: String,
    pub lookup_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::String,
            hide_loopback: false,
            lookup_url: default_lookup_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

fn default_lookup_url() -> String {
    "http://ifconfig.me/ip".to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    format: Option<String>,
    hide_loopback: Option<bool>,
    lookup_url: Option<String>,
    lookup_timeout_secs: Option<u64>,
}

/// Load config: merge default, then config file (if present), then env vars.
/// CLI flags are applied by the caller on top of the result.
pub fn load() -> Config {
    let mut c = Config::default();
    if let Some(f) = load_file() {
        if let Some(format) = f.format.as_deref().and_then(OutputFormat::from_name) {
            c.format = format;
        }
        if let Some(hide) = f.hide_loopback {
            c.hide_loopback = hide;
        }
        if let Some(url) = f.lookup_url {
            c.lookup_url = url;
        }
        if let Some(secs) = f.lookup_timeout_secs {
            c.lookup_timeout_secs = secs;
        }
    }
    if let Ok(s) = std::env::var("MADDR_FORMAT") {
        if let Some(format) = OutputFormat::from_name(&s) {
            c.format = format;
        }
    }
    if let Ok(s) = std::env::var("MADDR_HIDE_LOOPBACK") {
        if let Ok(hide) = s.parse::<bool>() {
            c.hide_loopback = hide;
        }
    }
    if let Ok(s) = std::env::var("MADDR_LOOKUP_URL") {
        if !s.is_empty() {
            c.lookup_url = s;
        }
    }
    if let Ok(s) = std::env::var("MADDR_LOOKUP_TIMEOUT_SECS") {
        if let Ok(secs) = s.parse::<u64>() {
            c.lookup_timeout_secs = secs;
        }
    }
    c
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/maddr/config.toml"));
    }
    out.push(PathBuf::from("/etc/maddr/config.toml"));
    out
}

fn load_file() -> Option<FileConfig> {
    for p in config_paths() {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(c) = toml::from_str::<FileConfig>(&s) {
                    return Some(c);
                }
            }
            break;
        }
    }
    None
}
