//! Configuration loading.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from tessera.toml)
//! - `~/.config/tessera/tessera.toml`
//! - `./tessera.toml`

use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tessera_error::{ConfigError, TesseraResult};
use tessera_lifecycle::Orchestrator;
use tessera_storage::{FileSystemStorage, MemoryStorage, ObjectStore, StorageRegistry};
use tessera_template::{DEFAULT_URL_TEMPLATE, UrlTemplate};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../tessera.toml");

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_backend() -> String {
    "local".to_string()
}

/// `[media]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct MediaConfig {
    /// URL template for fields without a `url` option
    #[serde(default = "default_url_template")]
    url_template: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
        }
    }
}

/// Kind of storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Files under a local directory
    Filesystem,
    /// Process memory, for embedding and tests
    Memory,
}

/// One `[storage.backends.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct BackendConfig {
    /// Backend kind
    kind: BackendKind,
    /// Root directory, filesystem backends only
    #[serde(default)]
    root: Option<PathBuf>,
    /// Public base URL of stored objects
    #[serde(default)]
    endpoint: String,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct StorageConfig {
    /// Backend used by fields without a `storage` option
    #[serde(default = "default_backend")]
    default: String,
    /// Backends by name
    #[serde(default)]
    backends: BTreeMap<String, BackendConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default: default_backend(),
            backends: BTreeMap::new(),
        }
    }
}

/// Top-level Tessera configuration.
///
/// # Example
///
/// ```no_run
/// use tessera::TesseraConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TesseraConfig::load()?;
/// let orchestrator = config.orchestrator()?;
/// println!("default backend: {}", orchestrator.storage().default_name());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct TesseraConfig {
    /// Media settings
    #[serde(default)]
    media: MediaConfig,
    /// Storage settings
    #[serde(default)]
    storage: StorageConfig,
}

impl TesseraConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> TesseraResult<Self> {
        debug!("Loading configuration from file");
        let builder = Config::builder().add_source(File::from(path.as_ref()));
        Self::build(builder)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(text: &str) -> TesseraResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    /// Load the bundled defaults overridden by the user and project files.
    ///
    /// # Errors
    ///
    /// Returns an error if any present file cannot be parsed.
    #[instrument]
    pub fn load() -> TesseraResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("tessera/tessera.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("tessera").required(false));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> TesseraResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Parsed default URL template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed.
    pub fn url_template(&self) -> TesseraResult<UrlTemplate> {
        Ok(UrlTemplate::parse(&self.media.url_template)?)
    }

    /// Storage registry with every configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the default backend is not configured, a
    /// filesystem backend has no root, or its root cannot be created.
    #[instrument(skip(self), fields(default = %self.storage.default))]
    pub fn build_registry(&self) -> TesseraResult<StorageRegistry> {
        if !self.storage.backends.contains_key(&self.storage.default) {
            return Err(ConfigError::new(format!(
                "Default storage backend '{}' is not configured",
                self.storage.default
            ))
            .into());
        }

        let mut registry = StorageRegistry::new(self.storage.default.as_str());
        for (name, backend) in &self.storage.backends {
            let store: Arc<dyn ObjectStore> = match backend.kind {
                BackendKind::Filesystem => {
                    let root = backend.root.clone().ok_or_else(|| {
                        ConfigError::new(format!(
                            "Filesystem storage backend '{}' needs a root",
                            name
                        ))
                    })?;
                    Arc::new(FileSystemStorage::new(root, backend.endpoint.as_str())?)
                }
                BackendKind::Memory => Arc::new(MemoryStorage::new(backend.endpoint.as_str())),
            };
            registry.register(name.as_str(), store);
        }
        Ok(registry)
    }

    /// Orchestrator over the configured backends and URL template.
    ///
    /// # Errors
    ///
    /// Same as [`build_registry`](Self::build_registry) and
    /// [`url_template`](Self::url_template).
    pub fn orchestrator(&self) -> TesseraResult<Orchestrator> {
        Ok(Orchestrator::new(self.build_registry()?).with_url_template(self.url_template()?))
    }
}
