//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// College and major link heuristics
    #[serde(default)]
    pub links: LinkConfig,

    /// Curriculum page text extraction settings
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// Language model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.links.college_keywords.is_empty() {
            return Err(AppError::validation("links.college_keywords is empty"));
        }
        if self.links.major_keywords.is_empty() {
            return Err(AppError::validation("links.major_keywords is empty"));
        }
        if self.cleaning.stripped_tags.is_empty() {
            return Err(AppError::validation("cleaning.stripped_tags is empty"));
        }
        if self.model.name.trim().is_empty() {
            return Err(AppError::validation("model.name is empty"));
        }
        if self.model.timeout_secs == 0 {
            return Err(AppError::validation("model.timeout_secs must be > 0"));
        }
        if self.output.dir.trim().is_empty() {
            return Err(AppError::validation("output.dir is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Politeness delay between page fetches in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Keyword heuristics for picking college and major links.
///
/// Keywords are matched case-insensitively as substrings of the anchor text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Anchor text fragments marking a college link on the catalog root
    #[serde(default = "defaults::college_keywords")]
    pub college_keywords: Vec<String>,

    /// Anchor text fragments marking a major/program link on a college page
    #[serde(default = "defaults::major_keywords")]
    pub major_keywords: Vec<String>,

    /// Anchor text fragments that disqualify a major link
    #[serde(default = "defaults::major_exclude_keywords")]
    pub major_exclude_keywords: Vec<String>,

    /// Treat links with identical text in one scope as the same entity
    #[serde(default = "defaults::enabled")]
    pub dedupe_by_name: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            college_keywords: defaults::college_keywords(),
            major_keywords: defaults::major_keywords(),
            major_exclude_keywords: defaults::major_exclude_keywords(),
            dedupe_by_name: defaults::enabled(),
        }
    }
}

/// Curriculum page text extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Tags removed from the page before any text is read
    #[serde(default = "defaults::stripped_tags")]
    pub stripped_tags: Vec<String>,

    /// A list is kept when its text contains one of these
    #[serde(default = "defaults::list_keywords")]
    pub list_keywords: Vec<String>,

    /// An element is kept when one of its classes contains one of these
    #[serde(default = "defaults::section_class_keywords")]
    pub section_class_keywords: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            stripped_tags: defaults::stripped_tags(),
            list_keywords: defaults::list_keywords(),
            section_class_keywords: defaults::section_class_keywords(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Model identifier
    #[serde(default = "defaults::model_name")]
    pub name: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,

    /// Timeout for a single completion in seconds
    #[serde(default = "defaults::model_timeout")]
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::config(format!("{} is not set", self.api_key_env)))
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            name: defaults::model_name(),
            api_key_env: defaults::api_key_env(),
            timeout_secs: defaults::model_timeout(),
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the gathered school files
    #[serde(default = "defaults::output_dir")]
    pub dir: String,
}

impl OutputConfig {
    /// Output directory resolved against a base path.
    pub fn dir_path(&self, base: &Path) -> PathBuf {
        base.join(&self.dir)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; curriculum-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        1000
    }

    // Link defaults
    pub fn college_keywords() -> Vec<String> {
        vec!["college of".into(), "school of".into()]
    }
    pub fn major_keywords() -> Vec<String> {
        vec![
            "b.s.".into(),
            "b.a.".into(),
            "major".into(),
            "program".into(),
            "degree".into(),
        ]
    }
    pub fn major_exclude_keywords() -> Vec<String> {
        vec!["minor".into(), "certificate".into()]
    }
    pub fn enabled() -> bool {
        true
    }

    // Cleaning defaults
    pub fn stripped_tags() -> Vec<String> {
        vec![
            "nav".into(),
            "header".into(),
            "footer".into(),
            "script".into(),
            "style".into(),
        ]
    }
    pub fn list_keywords() -> Vec<String> {
        vec!["credit".into(), "course".into(), "semester".into()]
    }
    pub fn section_class_keywords() -> Vec<String> {
        vec![
            "course".into(),
            "curriculum".into(),
            "semester".into(),
            "year".into(),
        ]
    }

    // Model defaults
    pub fn api_base() -> String {
        "https://api.openai.com/v1".into()
    }
    pub fn model_name() -> String {
        "gpt-4o-mini".into()
    }
    pub fn api_key_env() -> String {
        "OPENAI_API_KEY".into()
    }
    pub fn model_timeout() -> u64 {
        120
    }

    // Output defaults
    pub fn output_dir() -> String {
        "data/output".into()
    }
}
