//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in order: YAML file(s) or inline YAML, then
//! `FOLIO__`-prefixed environment variables (`__` separates nesting levels, so
//! `FOLIO__IMAGES__JPEG_QUALITY=70` overrides `images.jpeg_quality`). After the
//! merge every string value has `${VAR}` placeholders expanded, which is the
//! preferred way to inject credentials.
use config::{Config, ConfigError, Environment, File};
use folio_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct FolioConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub images: ImageConfig,
    /// Where the experience HTML comes from. The CLI may override it.
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub emit_stderr: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
            emit_stderr: false,
            dir: None,
        }
    }
}

impl LoggingConfig {
    /// Translate into the initializer settings used by `folio-common`.
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format: self.format,
            default_filter: self.level.clone(),
        }
    }
}

/// Bounds for the logo transcoder.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Logos larger than this are treated as failed fetches.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

/// The tag is `kind`; the remaining keys are the variant's fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Pre-captured HTML on disk.
    File { path: PathBuf },
    /// Live capture through a WebDriver session.
    Linkedin {
        profile_url: String,
        email: String,
        password: String,
        #[serde(default = "default_webdriver_url")]
        webdriver_url: String,
        #[serde(default = "default_headless")]
        headless: bool,
        #[serde(default = "default_wait_secs")]
        wait_secs: u64,
    },
}

fn default_log_level() -> String {
    "info".into()
}
fn default_max_dimension() -> u32 {
    200
}
fn default_jpeg_quality() -> u8 {
    85
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_max_concurrent_fetches() -> usize {
    8
}
fn default_max_image_bytes() -> u64 {
    5 * 1024 * 1024
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_headless() -> bool {
    true
}
fn default_wait_secs() -> u64 {
    10
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &FolioConfig) -> Result<(), ConfigError> {
    let img = &cfg.images;
    if img.max_dimension == 0 {
        return Err(ConfigError::Message(
            "images.max_dimension must be greater than zero".into(),
        ));
    }
    if !(1..=100).contains(&img.jpeg_quality) {
        return Err(ConfigError::Message(format!(
            "images.jpeg_quality must be within 1..=100, got {}",
            img.jpeg_quality
        )));
    }
    if img.max_concurrent_fetches == 0 {
        return Err(ConfigError::Message(
            "images.max_concurrent_fetches must be greater than zero".into(),
        ));
    }
    if img.max_image_bytes == 0 {
        return Err(ConfigError::Message(
            "images.max_image_bytes must be greater than zero".into(),
        ));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct FolioConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FolioConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FolioConfigLoader {
    /// Start with no file sources; `FOLIO__` env overrides are applied at
    /// [`Self::load`]. Every field has a default except the optional `source`.
    ///
    /// ```
    /// use folio_config::FolioConfigLoader;
    ///
    /// let config = FolioConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.images.max_dimension, 200);
    /// assert!(config.source.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`Self::with_file`], but a missing file is silently skipped so
    /// deployments can rely purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use folio_config::{FolioConfigLoader, SourceConfig};
    ///
    /// let cfg = FolioConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// source:
    ///   kind: file
    ///   path: experience.html
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(matches!(cfg.source, Some(SourceConfig::File { .. })));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use folio_config::{FolioConfigLoader, SourceConfig};
    ///
    /// temp_env::with_var("LINKEDIN_PASSWORD", Some("injected-from-env"), || {
    ///     let config = FolioConfigLoader::new()
    ///         .with_yaml_str(r#"
    /// source:
    ///   kind: linkedin
    ///   profile_url: "https://www.linkedin.com/in/someone/"
    ///   email: "someone@example.com"
    ///   password: "${LINKEDIN_PASSWORD}"
    /// "#)
    ///         .load()
    ///         .expect("valid configuration");
    ///
    ///     match config.source {
    ///         Some(SourceConfig::Linkedin { password, webdriver_url, headless, .. }) => {
    ///             assert_eq!(password, "injected-from-env");
    ///             assert_eq!(webdriver_url, "http://localhost:9515");
    ///             assert!(headless);
    ///         }
    ///         other => panic!("expected linkedin source, got {other:?}"),
    ///     }
    /// });
    /// ```
    pub fn load(self) -> Result<FolioConfig, ConfigError> {
        // Environment goes last so it overrides every file/inline source.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FolioConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;

        Ok(typed)
    }
}
