//! Configuration file support for marquee
//!
//! Reads from marquee.toml in the current directory or any ancestor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    /// Site presentation settings
    #[serde(default)]
    pub site: SiteConfig,

    /// GitHub settings for release lookups
    #[serde(default)]
    pub github: GithubConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Quickstart page settings
    #[serde(default)]
    pub quickstart: QuickstartConfig,
}

/// Site-related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Title shown on the landing page
    #[serde(default = "default_title")]
    pub title: String,

    /// Directory holding the static site files and include partials
    /// Default: "site"
    #[serde(default = "default_site_root")]
    pub root: PathBuf,
}

/// GitHub-related configuration for release downloads
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct GithubConfig {
    /// Repository whose releases are displayed.
    /// Format: "owner/repo"
    #[serde(default)]
    pub repo: Option<String>,
}

/// Server-related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Port the site server listens on
    /// Default: 8080
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Quickstart-page configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuickstartConfig {
    /// Program name shown in the generated command line
    /// Default: "quickstart"
    #[serde(default = "default_program")]
    pub program: String,
}

fn default_title() -> String {
    "Project Site".to_string()
}

fn default_site_root() -> PathBuf {
    PathBuf::from("site")
}

fn default_port() -> u16 {
    8080
}

fn default_program() -> String {
    "quickstart".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            root: default_site_root(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for QuickstartConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

impl Config {
    /// Load config from marquee.toml
    /// Returns default config if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::find_config_path() {
            Self::load_from(&path)
        } else {
            Self::default()
        }
    }

    /// Load config from an explicit path, falling back to defaults on any
    /// read or parse failure.
    pub fn load_from(path: &std::path::Path) -> Self {
        if let Ok(contents) = std::fs::read_to_string(path) {
            if let Ok(config) = toml::from_str(&contents) {
                return config;
            }
        }
        Self::default()
    }

    /// Find marquee.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join("marquee.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }
}
