//! Configuration for truepedia.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TRUEPEDIA_HOME, TRUEPEDIA_HIGHLIGHTS, TRUEPEDIA_LANG)
//! 2. Config file (.truepedia/config.yaml)
//! 3. Defaults (~/.truepedia)
//!
//! Config file discovery:
//! - Searches current directory and parents for .truepedia/config.yaml
//! - Paths in config file are relative to the .truepedia/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::language;
use crate::text::DEFAULT_CHUNK_SIZE;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub wiki: Option<WikiConfig>,
    #[serde(default)]
    pub translation: Option<TranslationConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to config file)
    pub home: Option<String>,
    /// Highlights file (relative to config file)
    pub highlights: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WikiConfig {
    pub default_language: Option<String>,
    pub api_url: Option<String>,
    pub search_limit: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub cache_ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    pub endpoint: Option<String>,
    pub max_workers: Option<usize>,
    pub chunk_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to truepedia home (state directory)
    pub home: PathBuf,
    /// Path to the highlights JSON file
    pub highlights: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Encyclopedia settings
    pub wiki: WikiSettings,
    /// Translation settings
    pub translation: TranslationSettings,
}

#[derive(Debug, Clone)]
pub struct WikiSettings {
    /// Language used when none is given on the command line
    pub default_language: String,
    /// API URL template; `{lang}` is replaced with the language code
    pub api_url: String,
    pub search_limit: usize,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            api_url: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            search_limit: 10,
            timeout_seconds: 30,
            cache_ttl_seconds: 3600,
        }
    }
}

impl WikiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct TranslationSettings {
    pub endpoint: String,
    pub max_workers: usize,
    pub chunk_size: usize,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            max_workers: 12,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_seconds: 30,
        }
    }
}

impl TranslationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".truepedia").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge file settings over defaults
fn wiki_settings(file: Option<&WikiConfig>) -> WikiSettings {
    let defaults = WikiSettings::default();
    let Some(file) = file else {
        return defaults;
    };

    WikiSettings {
        default_language: file
            .default_language
            .clone()
            .unwrap_or(defaults.default_language),
        api_url: file.api_url.clone().unwrap_or(defaults.api_url),
        search_limit: file.search_limit.unwrap_or(defaults.search_limit),
        timeout_seconds: file.timeout_seconds.unwrap_or(defaults.timeout_seconds),
        cache_ttl_seconds: file.cache_ttl_seconds.unwrap_or(defaults.cache_ttl_seconds),
    }
}

fn translation_settings(file: Option<&TranslationConfig>) -> TranslationSettings {
    let defaults = TranslationSettings::default();
    let Some(file) = file else {
        return defaults;
    };

    TranslationSettings {
        endpoint: file.endpoint.clone().unwrap_or(defaults.endpoint),
        max_workers: file.max_workers.unwrap_or(defaults.max_workers).max(1),
        chunk_size: file.chunk_size.unwrap_or(defaults.chunk_size).max(1),
        timeout_seconds: file.timeout_seconds.unwrap_or(defaults.timeout_seconds),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let config = config_file.as_deref().map(load_config_file).transpose()?;
    resolve(config_file, config, |key| std::env::var(key).ok())
}

/// Apply env overrides (looked up through `env`) and defaults to a parsed file
fn resolve(
    config_file: Option<PathBuf>,
    config: Option<ConfigFile>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    // Default home directory
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".truepedia");

    // Paths in the file are relative to .truepedia/
    let config_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));
    let paths = config.as_ref().map(|c| c.paths.clone()).unwrap_or_default();

    let home = if let Some(env_home) = env("TRUEPEDIA_HOME") {
        PathBuf::from(env_home)
    } else if let Some(ref home_path) = paths.home {
        resolve_path(config_dir, home_path)
    } else {
        default_home
    };

    let highlights = if let Some(env_file) = env("TRUEPEDIA_HIGHLIGHTS") {
        PathBuf::from(env_file)
    } else if let Some(ref file_path) = paths.highlights {
        resolve_path(config_dir, file_path)
    } else {
        home.join("highlights.json")
    };

    let mut wiki = wiki_settings(config.as_ref().and_then(|c| c.wiki.as_ref()));
    if let Some(env_lang) = env("TRUEPEDIA_LANG") {
        wiki.default_language = env_lang;
    }
    if !language::is_supported(&wiki.default_language) {
        anyhow::bail!(
            "Unsupported default language '{}'. Run 'truepedia langs' for the list",
            wiki.default_language
        );
    }

    let translation = translation_settings(config.as_ref().and_then(|c| c.translation.as_ref()));

    Ok(ResolvedConfig {
        home,
        highlights,
        config_file,
        wiki,
        translation,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the highlights file path
pub fn highlights_path() -> Result<PathBuf> {
    Ok(config()?.highlights.clone())
}
