use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::DEFAULT_CART_KEY;
use crate::domain::product::Section;
use crate::pricing::DEFAULT_CURRENCY;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub storefront: StorefrontConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub cart_key: String,
    pub quota_bytes: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct StorefrontConfig {
    pub currency: String,
    pub default_section: Section,
    pub max_selectable_quantity: u32,
    pub confirmation_ms: u64,
    pub cart_page: String,
}

impl StorefrontConfig {
    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_ms)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub storage_backend: Option<StorageBackend>,
    pub storage_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub currency: Option<String>,
    pub default_section: Option<Section>,
    pub max_selectable_quantity: Option<u32>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::File,
                path: PathBuf::from(".pearlshop/profile.json"),
                cart_key: DEFAULT_CART_KEY.to_string(),
                quota_bytes: None,
            },
            storefront: StorefrontConfig {
                currency: DEFAULT_CURRENCY.to_string(),
                default_section: Section::Necklaces,
                max_selectable_quantity: 10,
                confirmation_ms: 900,
                cart_page: "cart.html".to_string(),
            },
            catalog: CatalogConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected memory|file)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("pearlshop.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
            if let Some(path) = storage.path {
                self.storage.path = path;
            }
            if let Some(cart_key) = storage.cart_key {
                self.storage.cart_key = cart_key;
            }
            if let Some(quota_bytes) = storage.quota_bytes {
                self.storage.quota_bytes = Some(quota_bytes);
            }
        }

        if let Some(storefront) = patch.storefront {
            if let Some(currency) = storefront.currency {
                self.storefront.currency = currency;
            }
            if let Some(default_section) = storefront.default_section {
                self.storefront.default_section = default_section.parse().map_err(|error| {
                    ConfigError::Validation(format!("storefront.default_section: {error}"))
                })?;
            }
            if let Some(max_selectable_quantity) = storefront.max_selectable_quantity {
                self.storefront.max_selectable_quantity = max_selectable_quantity;
            }
            if let Some(confirmation_ms) = storefront.confirmation_ms {
                self.storefront.confirmation_ms = confirmation_ms;
            }
            if let Some(cart_page) = storefront.cart_page {
                self.storefront.cart_page = cart_page;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PEARLSHOP_STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        if let Some(value) = read_env("PEARLSHOP_STORAGE_PATH") {
            self.storage.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("PEARLSHOP_STORAGE_CART_KEY") {
            self.storage.cart_key = value;
        }
        if let Some(value) = read_env("PEARLSHOP_STORAGE_QUOTA_BYTES") {
            self.storage.quota_bytes = Some(parse_usize("PEARLSHOP_STORAGE_QUOTA_BYTES", &value)?);
        }

        if let Some(value) = read_env("PEARLSHOP_CURRENCY") {
            self.storefront.currency = value;
        }
        if let Some(value) = read_env("PEARLSHOP_DEFAULT_SECTION") {
            self.storefront.default_section =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "PEARLSHOP_DEFAULT_SECTION".to_string(),
                    value: value.clone(),
                })?;
        }
        if let Some(value) = read_env("PEARLSHOP_MAX_SELECTABLE_QUANTITY") {
            self.storefront.max_selectable_quantity =
                parse_u32("PEARLSHOP_MAX_SELECTABLE_QUANTITY", &value)?;
        }
        if let Some(value) = read_env("PEARLSHOP_CONFIRMATION_MS") {
            self.storefront.confirmation_ms = parse_u64("PEARLSHOP_CONFIRMATION_MS", &value)?;
        }
        if let Some(value) = read_env("PEARLSHOP_CART_PAGE") {
            self.storefront.cart_page = value;
        }

        if let Some(value) = read_env("PEARLSHOP_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("PEARLSHOP_LOGGING_LEVEL").or_else(|| read_env("PEARLSHOP_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PEARLSHOP_LOGGING_FORMAT").or_else(|| read_env("PEARLSHOP_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(path) = overrides.storage_path {
            self.storage.path = path;
        }
        if let Some(path) = overrides.catalog_path {
            self.catalog.path = Some(path);
        }
        if let Some(currency) = overrides.currency {
            self.storefront.currency = currency;
        }
        if let Some(section) = overrides.default_section {
            self.storefront.default_section = section;
        }
        if let Some(max_selectable_quantity) = overrides.max_selectable_quantity {
            self.storefront.max_selectable_quantity = max_selectable_quantity;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_storefront(&self.storefront)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("pearlshop.toml"), PathBuf::from("config/pearlshop.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.cart_key.trim().is_empty() {
        return Err(ConfigError::Validation("storage.cart_key must not be empty".to_string()));
    }

    if storage.backend == StorageBackend::File && storage.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "storage.path is required for the file backend".to_string(),
        ));
    }

    if storage.quota_bytes == Some(0) {
        return Err(ConfigError::Validation(
            "storage.quota_bytes must be greater than zero when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_storefront(storefront: &StorefrontConfig) -> Result<(), ConfigError> {
    let currency = storefront.currency.trim();
    if currency.is_empty() || !currency.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(
            "storefront.currency must be an uppercase currency code such as `SAR`".to_string(),
        ));
    }

    if !(1..=99).contains(&storefront.max_selectable_quantity) {
        return Err(ConfigError::Validation(
            "storefront.max_selectable_quantity must be in range 1..=99".to_string(),
        ));
    }

    if storefront.confirmation_ms > 10_000 {
        return Err(ConfigError::Validation(
            "storefront.confirmation_ms must be at most 10000".to_string(),
        ));
    }

    if storefront.cart_page.trim().is_empty() {
        return Err(ConfigError::Validation("storefront.cart_page must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    storefront: Option<StorefrontPatch>,
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<StorageBackend>,
    path: Option<PathBuf>,
    cart_key: Option<String>,
    quota_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct StorefrontPatch {
    currency: Option<String>,
    default_section: Option<String>,
    max_selectable_quantity: Option<u32>,
    confirmation_ms: Option<u64>,
    cart_page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

/// Every environment variable `AppConfig::load` consults.
pub const ENV_VARS: [&str; 14] = [
    "PEARLSHOP_STORAGE_BACKEND",
    "PEARLSHOP_STORAGE_PATH",
    "PEARLSHOP_STORAGE_CART_KEY",
    "PEARLSHOP_STORAGE_QUOTA_BYTES",
    "PEARLSHOP_CURRENCY",
    "PEARLSHOP_DEFAULT_SECTION",
    "PEARLSHOP_MAX_SELECTABLE_QUANTITY",
    "PEARLSHOP_CONFIRMATION_MS",
    "PEARLSHOP_CART_PAGE",
    "PEARLSHOP_CATALOG_PATH",
    "PEARLSHOP_LOGGING_LEVEL",
    "PEARLSHOP_LOG_LEVEL",
    "PEARLSHOP_LOGGING_FORMAT",
    "PEARLSHOP_LOG_FORMAT",
];
