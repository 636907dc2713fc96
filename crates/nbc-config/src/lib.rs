//! Configuration management for nbc.
//!
//! Parses `nbc.toml` configuration files with serde and provides
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
//! - `html.stylesheets`
//! - `html.mathjax_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output format.
    pub format: Option<String>,
    /// Override output encoding.
    pub encoding: Option<String>,
    /// Override stale figure removal.
    pub clear_figures: Option<bool>,
    /// Override raw cell rendering.
    pub raw_as_verbatim: Option<bool>,
    /// Output file path.
    pub output: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nbc.toml";

/// Output formats accepted in `convert.format`.
pub const FORMATS: [&str; 5] = ["rst", "html", "latex", "markdown", "py"];

/// Encodings accepted in `convert.encoding`, after lowercasing and removing
/// `-`/`_`.
const ENCODINGS: [&str; 6] = ["utf8", "latin1", "iso88591", "l1", "ascii", "usascii"];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion configuration.
    pub convert: ConvertConfig,
    /// Markdown backend configuration.
    pub markdown: MarkdownConfig,
    /// Python script backend configuration.
    pub py: PyConfig,
    /// HTML configuration (stylesheet paths are relative strings from TOML).
    html: HtmlConfigRaw,

    /// Resolved HTML configuration (set after loading).
    #[serde(skip)]
    pub html_resolved: HtmlConfig,
    /// Output file path (CLI only).
    #[serde(skip)]
    pub output: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Output format name.
    pub format: String,
    /// Output text encoding name.
    pub encoding: String,
    /// Remove figures from a previous run before converting.
    pub clear_figures: bool,
    /// Render raw cells as literal blocks.
    pub raw_as_verbatim: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: "rst".to_owned(),
            encoding: "utf-8".to_owned(),
            clear_figures: true,
            raw_as_verbatim: false,
        }
    }
}

/// Markdown backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Fence code blocks with a language tag.
    pub highlight_source: bool,
    /// Emit `*In[n]:*`/`*Out[n]:*` prompts.
    pub show_prompts: bool,
    /// Put the input prompt on the first source line.
    pub inline_prompt: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_source: true,
            show_prompts: false,
            inline_prompt: false,
        }
    }
}

/// Python script backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PyConfig {
    /// Emit `# In[n]:`/`# Out[n]:` prompts.
    pub show_prompts: bool,
    /// Include outputs as comments.
    pub show_output: bool,
}

impl Default for PyConfig {
    fn default() -> Self {
        Self {
            show_prompts: true,
            show_output: true,
        }
    }
}

/// Raw HTML configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize)]
#[serde(default)]
struct HtmlConfigRaw {
    stylesheets: Vec<String>,
    mathjax: bool,
    mathjax_url: Option<String>,
}

impl Default for HtmlConfigRaw {
    fn default() -> Self {
        Self {
            stylesheets: Vec::new(),
            mathjax: true,
            mathjax_url: None,
        }
    }
}

/// Resolved HTML configuration with absolute stylesheet paths.
#[derive(Debug)]
pub struct HtmlConfig {
    /// Stylesheets embedded in the page, in order.
    pub stylesheets: Vec<PathBuf>,
    /// Whether the page loads MathJax.
    pub mathjax: bool,
    /// MathJax script URL; the renderer default when unset.
    pub mathjax_url: Option<String>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            stylesheets: Vec::new(),
            mathjax: true,
            mathjax_url: None,
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
        /// Config field path (e.g., "`html.mathjax_url`").
        field: String,
        /// Error message (e.g., "${`MATHJAX_URL`} not set").
        message: String,
    },
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

fn normalize_encoding(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `nbc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(format) = &settings.format {
            self.convert.format.clone_from(format);
        }
        if let Some(encoding) = &settings.encoding {
            self.convert.encoding.clone_from(encoding);
        }
        if let Some(clear_figures) = settings.clear_figures {
            self.convert.clear_figures = clear_figures;
        }
        if let Some(raw_as_verbatim) = settings.raw_as_verbatim {
            self.convert.raw_as_verbatim = raw_as_verbatim;
        }
        if let Some(output) = &settings.output {
            self.output = Some(output.clone());
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
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
        self.validate_convert()?;
        self.validate_html()?;
        Ok(())
    }

    /// Validate conversion configuration.
    fn validate_convert(&self) -> Result<(), ConfigError> {
        if !FORMATS.contains(&self.convert.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "convert.format '{}' is not one of: {}",
                self.convert.format,
                FORMATS.join(", ")
            )));
        }

        let encoding = normalize_encoding(&self.convert.encoding);
        if !ENCODINGS.contains(&encoding.as_str()) {
            return Err(ConfigError::Validation(format!(
                "convert.encoding '{}' is not supported, use utf-8, latin-1 or ascii",
                self.convert.encoding
            )));
        }

        Ok(())
    }

    /// Validate HTML configuration.
    fn validate_html(&self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.html_resolved.mathjax_url {
            require_http_url(url, "html.mathjax_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for stylesheet in &mut self.html.stylesheets {
            *stylesheet = expand::expand_env(stylesheet, "html.stylesheets")?;
        }
        if let Some(ref url) = self.html.mathjax_url {
            self.html.mathjax_url = Some(expand::expand_env(url, "html.mathjax_url")?);
        }
        Ok(())
    }

    /// Resolve relative stylesheet paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.html_resolved = HtmlConfig {
            stylesheets: self
                .html
                .stylesheets
                .iter()
                .map(|path| config_dir.join(path))
                .collect(),
            mathjax: self.html.mathjax,
            mathjax_url: self.html.mathjax_url.clone(),
        };
    }
}
