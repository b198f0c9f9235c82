//! Configuration management for apidocs.
//!
//! Parses `apidocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `site.api_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override canonical site URL.
    pub base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "apidocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity used by the plain-text exports.
    pub site: SiteConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Navigation grouping rules.
    pub navigation: NavigationConfig,
    /// Syntax highlighting themes.
    pub highlight: HighlightSettings,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, used as the heading of `llms.txt`.
    pub title: String,
    /// One-paragraph summary quoted under the title.
    pub summary: Option<String>,
    /// Canonical URL the documentation is published at.
    pub base_url: String,
    /// URL of the documented API, if any.
    pub api_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_owned(),
            summary: None,
            base_url: "https://docs.example.com".to_owned(),
            api_url: None,
        }
    }
}

impl SiteConfig {
    /// Canonical URL of a route (`/` maps to the base URL itself).
    #[must_use]
    pub fn url_for(&self, route: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if route == "/" {
            base.to_owned()
        } else {
            format!("{base}{route}")
        }
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Clone, Default)]
pub struct ContentConfig {
    /// Directory holding the markdown sources.
    pub source_dir: PathBuf,
    /// Directory the build writes its artifacts to.
    pub output_dir: PathBuf,
}

/// Navigation grouping rules.
///
/// Documents are grouped by their first slug segment. Segments listed in
/// `sections` are emitted in that order; sections listed in `grouped` are
/// further split by their second slug segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Ordered section keys.
    pub sections: Vec<String>,
    /// Sections bucketed into subgroups.
    pub grouped: Vec<String>,
    /// Display label overrides keyed by section key.
    pub labels: BTreeMap<String, String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let sections = [
            "getting-started",
            "concepts",
            "integrations",
            "objects",
            "api-reference",
            "contributing-guide",
        ];
        let labels = [
            ("getting-started", "Getting Started"),
            ("concepts", "Concepts"),
            ("integrations", "Integrations"),
            ("objects", "Objects"),
            ("api-reference", "API Reference"),
            ("contributing-guide", "Contributing Guide"),
        ];
        Self {
            sections: sections.iter().map(|&s| s.to_owned()).collect(),
            grouped: vec!["api-reference".to_owned(), "contributing-guide".to_owned()],
            labels: labels
                .iter()
                .map(|&(key, label)| (key.to_owned(), label.to_owned()))
                .collect(),
        }
    }
}

impl NavigationConfig {
    /// Whether `key` is one of the ordered sections.
    #[must_use]
    pub fn is_section(&self, key: &str) -> bool {
        self.sections.iter().any(|s| s == key)
    }

    /// Whether `key` is split into subgroups.
    #[must_use]
    pub fn is_grouped(&self, key: &str) -> bool {
        self.grouped.iter().any(|s| s == key)
    }
}

/// Syntax highlighting theme names.
///
/// Names refer to the themes bundled with the highlighter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Theme used at the stylesheet root.
    pub light_theme: String,
    /// Theme scoped under the `.dark` class.
    pub dark_theme: String,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            light_theme: "InspiredGitHub".to_owned(),
            dark_theme: "base16-ocean.dark".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `apidocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.content_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            navigation: NavigationConfig::default(),
            highlight: HighlightSettings::default(),
            content_resolved: ContentConfig {
                source_dir: base.join("content"),
                output_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_navigation()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.base_url, "site.base_url")?;
        require_http_url(&self.site.base_url, "site.base_url")?;
        if let Some(ref api_url) = self.site.api_url {
            require_http_url(api_url, "site.api_url")?;
        }
        Ok(())
    }

    fn validate_navigation(&self) -> Result<(), ConfigError> {
        let nav = &self.navigation;
        if nav.sections.is_empty() {
            return Err(ConfigError::Validation(
                "navigation.sections cannot be empty".to_owned(),
            ));
        }
        for (i, key) in nav.sections.iter().enumerate() {
            require_non_empty(key, "navigation.sections")?;
            if nav.sections[..i].contains(key) {
                return Err(ConfigError::Validation(format!(
                    "navigation.sections lists \"{key}\" more than once"
                )));
            }
        }
        if let Some(key) = nav.grouped.iter().find(|key| !nav.is_section(key)) {
            return Err(ConfigError::Validation(format!(
                "navigation.grouped section \"{key}\" is not listed in navigation.sections"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;
        if let Some(ref url) = self.site.api_url {
            self.site.api_url = Some(expand::expand_env(url, "site.api_url")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), "content"),
            output_dir: resolve(self.content.output_dir.as_deref(), "dist"),
        };
    }
}
