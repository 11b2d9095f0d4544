use std::sync::Arc;

use pearlshop_core::config::{AppConfig, ConfigError, LoadOptions};
use pearlshop_core::{CartStore, Catalog, CatalogError};
use pearlshop_db::{open_storage, DynStorage};
use pearlshop_web::{RenderError, Storefront, StorefrontSettings};
use thiserror::Error;
use tracing::info;

pub struct Session {
    pub config: AppConfig,
    pub storefront: Storefront<DynStorage>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog could not be loaded: {0}")]
    Catalog(#[from] CatalogError),
    #[error("storefront templates could not be loaded: {0}")]
    Render(#[from] RenderError),
}

impl BootstrapError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_validation",
            Self::Catalog(_) => "catalog",
            Self::Render(_) => "templates",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Catalog(_) => 3,
            Self::Render(_) => 4,
        }
    }
}

pub fn bootstrap(options: LoadOptions) -> Result<Session, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Session, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting storefront bootstrap");

    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::sample(),
    };
    let source = match &config.catalog.path {
        Some(path) => path.display().to_string(),
        None => "built-in".to_string(),
    };
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        products = catalog.len(),
        source = %source,
        "catalog loaded"
    );

    let storage = open_storage(&config.storage);
    let cart = CartStore::new(storage, Arc::new(catalog)).with_key(config.storage.cart_key.clone());
    let storefront = Storefront::new(cart, StorefrontSettings::from(&config.storefront))?;

    Ok(Session { config, storefront })
}
