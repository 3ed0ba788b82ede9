//! Configuration management for MPA.
//!
//! Parses `mpa.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Paths in the file are relative strings; after loading they are resolved
//! against the config file's directory (or the current directory when no
//! file exists) into the absolute paths the rest of the system consumes.
//! CLI settings can be applied during load via [`CliSettings`] and take
//! precedence over file values.

use std::path::{Path, PathBuf};

use mpa_render::EngineOptions;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mpa.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the pages directory.
    pub pages_dir: Option<PathBuf>,
    /// Override the global template path.
    pub template: Option<PathBuf>,
    /// Override the build output directory.
    pub out_dir: Option<PathBuf>,
    /// Override nested page discovery.
    pub nested: Option<bool>,
    /// Override the auto-open convenience flag.
    pub open_auto: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dev server configuration.
    pub server: ServerConfig,
    /// Page discovery configuration (paths are relative strings from TOML).
    pages: PagesConfigRaw,
    /// Template engine options (opaque pass-through to the engine).
    pub engine: EngineOptions,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Enable diagnostic logging.
    pub verbose: bool,

    /// Project root (set after loading).
    #[serde(skip)]
    pub root: PathBuf,
    /// Resolved page configuration (set after loading).
    #[serde(skip)]
    pub pages_resolved: PagesConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Dev server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Base public path prefix for injected entry scripts.
    pub base: String,
    /// Log the local URL on startup for the user to open.
    pub open_auto: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5173,
            base: "/".to_owned(),
            open_auto: true,
        }
    }
}

/// Raw page configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PagesConfigRaw {
    dir: Option<String>,
    template: Option<String>,
    nested: Option<bool>,
    output_dir: Option<String>,
    default_data: Map<String, Value>,
}

/// Resolved page configuration with absolute paths.
#[derive(Clone, Debug)]
pub struct PagesConfig {
    /// Directory scanned for page entry points.
    pub dir: PathBuf,
    /// Global fallback template path.
    pub template: PathBuf,
    /// Recurse into subdirectories of matched pages.
    pub nested: bool,
    /// Output path pattern (batch mode only); `None` for the identity layout.
    pub output_dir: Option<String>,
    /// Record merged into every render context.
    pub default_data: Map<String, Value>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("src/pages"),
            template: PathBuf::from("index.html"),
            nested: true,
            output_dir: None,
            default_data: Map::new(),
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    out_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Clone, Debug, Default)]
pub struct BuildConfig {
    /// Final output directory for the bundled site.
    pub out_dir: PathBuf,
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
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mpa.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(pages_dir) = &settings.pages_dir {
            self.pages_resolved.dir = self.absolute(pages_dir);
        }
        if let Some(template) = &settings.template {
            self.pages_resolved.template = self.absolute(template);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.build_resolved.out_dir = self.absolute(out_dir);
        }
        if let Some(nested) = settings.nested {
            self.pages_resolved.nested = nested;
        }
        if let Some(open_auto) = settings.open_auto {
            self.server.open_auto = open_auto;
        }
    }

    /// Resolve a possibly-relative path against the project root.
    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
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
            server: ServerConfig::default(),
            pages: PagesConfigRaw::default(),
            engine: EngineOptions::default(),
            build: BuildConfigRaw::default(),
            verbose: false,
            root: base.to_path_buf(),
            pages_resolved: PagesConfig {
                dir: base.join("src/pages"),
                template: base.join("index.html"),
                ..PagesConfig::default()
            },
            build_resolved: BuildConfig {
                out_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Resolve raw string paths into absolute paths under `root`.
    fn resolve_paths(&mut self, root: &Path) -> Result<(), ConfigError> {
        self.root = root.to_path_buf();

        let dir = self.pages.dir.as_deref().unwrap_or("src/pages");
        require_non_empty(dir, "pages.dir")?;
        let template = self.pages.template.as_deref().unwrap_or("index.html");
        require_non_empty(template, "pages.template")?;
        let out_dir = self.build.out_dir.as_deref().unwrap_or("dist");
        require_non_empty(out_dir, "build.out_dir")?;

        self.pages_resolved = PagesConfig {
            dir: root.join(dir),
            template: root.join(template),
            nested: self.pages.nested.unwrap_or(true),
            output_dir: self.pages.output_dir.clone(),
            default_data: self.pages.default_data.clone(),
        };
        self.build_resolved = BuildConfig {
            out_dir: root.join(out_dir),
        };

        Ok(())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        require_non_empty(&self.server.base, "server.base")?;
        if let Some(pattern) = &self.pages_resolved.output_dir {
            require_non_empty(pattern, "pages.output_dir")?;
        }
        Ok(())
    }
}
