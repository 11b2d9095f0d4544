use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pearlshop_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let overrides = options.overrides.clone();
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for field in fields(&config) {
        let source = if is_overridden(field.key_path, &overrides) {
            "flag".to_string()
        } else {
            field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            )
        };
        lines.push(render_line(field.key_path, &field.value, source));
    }

    CommandResult::text(lines.join("\n"))
}

fn field(key_path: &'static str, env_keys: &'static [&'static str], value: String) -> Field {
    Field { key_path, env_keys, value }
}

fn fields(config: &AppConfig) -> Vec<Field> {
    vec![
        field(
            "storage.backend",
            &["PEARLSHOP_STORAGE_BACKEND"],
            format!("{:?}", config.storage.backend).to_ascii_lowercase(),
        ),
        field(
            "storage.path",
            &["PEARLSHOP_STORAGE_PATH"],
            config.storage.path.display().to_string(),
        ),
        field("storage.cart_key", &["PEARLSHOP_STORAGE_CART_KEY"], config.storage.cart_key.clone()),
        field(
            "storage.quota_bytes",
            &["PEARLSHOP_STORAGE_QUOTA_BYTES"],
            config
                .storage
                .quota_bytes
                .map_or_else(|| "<unlimited>".to_string(), |limit| limit.to_string()),
        ),
        field("storefront.currency", &["PEARLSHOP_CURRENCY"], config.storefront.currency.clone()),
        field(
            "storefront.default_section",
            &["PEARLSHOP_DEFAULT_SECTION"],
            config.storefront.default_section.to_string(),
        ),
        field(
            "storefront.max_selectable_quantity",
            &["PEARLSHOP_MAX_SELECTABLE_QUANTITY"],
            config.storefront.max_selectable_quantity.to_string(),
        ),
        field(
            "storefront.confirmation_ms",
            &["PEARLSHOP_CONFIRMATION_MS"],
            config.storefront.confirmation_ms.to_string(),
        ),
        field(
            "storefront.cart_page",
            &["PEARLSHOP_CART_PAGE"],
            config.storefront.cart_page.clone(),
        ),
        field(
            "catalog.path",
            &["PEARLSHOP_CATALOG_PATH"],
            config
                .catalog
                .path
                .as_ref()
                .map_or_else(|| "<built-in>".to_string(), |path| path.display().to_string()),
        ),
        field(
            "logging.level",
            &["PEARLSHOP_LOGGING_LEVEL", "PEARLSHOP_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        field(
            "logging.format",
            &["PEARLSHOP_LOGGING_FORMAT", "PEARLSHOP_LOG_FORMAT"],
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
        ),
    ]
}

fn is_overridden(key_path: &str, overrides: &ConfigOverrides) -> bool {
    match key_path {
        "storage.backend" => overrides.storage_backend.is_some(),
        "storage.path" => overrides.storage_path.is_some(),
        "catalog.path" => overrides.catalog_path.is_some(),
        "storefront.currency" => overrides.currency.is_some(),
        "storefront.default_section" => overrides.default_section.is_some(),
        "storefront.max_selectable_quantity" => overrides.max_selectable_quantity.is_some(),
        "logging.level" => overrides.log_level.is_some(),
        _ => false,
    }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("pearlshop.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/pearlshop.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
