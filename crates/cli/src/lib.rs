pub mod bootstrap;
pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pearlshop_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, StorageBackend};
use pearlshop_core::{ProductId, Section};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pearlshop",
    about = "Pearl shop storefront CLI",
    long_about = "Render the storefront pages and drive the shopping cart against a storage profile.",
    after_help = "Examples:\n  pearlshop catalog --section bracelets\n  pearlshop add 2 --qty 3\n  pearlshop set 2 0\n  pearlshop cart"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a pearlshop.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Fail when the config file does not exist")]
    require_config: bool,
    #[command(flatten)]
    overrides: OverrideArgs,
    #[command(subcommand)]
    command: Command,
}

/// Flags that take precedence over the config file and `PEARLSHOP_*` variables.
#[derive(Debug, clap::Args)]
struct OverrideArgs {
    #[arg(long, global = true, help = "Storage backend: memory | file")]
    storage: Option<StorageBackend>,
    #[arg(long, global = true, help = "Path of the storage profile file")]
    profile: Option<PathBuf>,
    #[arg(long, global = true, help = "TOML catalog file replacing the built-in catalog")]
    catalog_file: Option<PathBuf>,
    #[arg(long, global = true, help = "Currency code shown before prices")]
    currency: Option<String>,
    #[arg(long, global = true, help = "Section shown when none is selected")]
    default_section: Option<Section>,
    #[arg(long, global = true, help = "Largest quantity offered by the catalog selector")]
    max_quantity: Option<u32>,
    #[arg(long, global = true, help = "trace | debug | info | warn | error")]
    log_level: Option<String>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            storage_backend: args.storage,
            storage_path: args.profile,
            catalog_path: args.catalog_file,
            currency: args.currency,
            default_section: args.default_section,
            max_selectable_quantity: args.max_quantity,
            log_level: args.log_level,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Render the shop page for a section")]
    Catalog {
        #[arg(long, help = "necklaces | bracelets | earrings | sets")]
        section: Option<String>,
    },
    #[command(about = "Render the cart page")]
    Cart,
    #[command(about = "Add units of a product to the cart")]
    Add {
        product_id: ProductId,
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        qty: String,
    },
    #[command(about = "Set a cart quantity; 0 removes the product")]
    Set {
        product_id: ProductId,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    #[command(about = "Remove a product from the cart")]
    Remove { product_id: ProductId },
    #[command(about = "Print the cart item count")]
    Count,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        config_path: cli.config,
        require_file: cli.require_config,
        overrides: cli.overrides.into(),
    };

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Catalog { section } => commands::catalog::run(options, section),
        Command::Cart => commands::cart::run(options),
        Command::Add { product_id, qty } => commands::add::run(options, product_id, &qty),
        Command::Set { product_id, value } => commands::set::run(options, product_id, &value),
        Command::Remove { product_id } => commands::remove::run(options, product_id),
        Command::Count => commands::count::run(options),
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so rendered pages and JSON results on stdout stay parseable.
/// `PEARLSHOP_LOG_FILTER` takes `EnvFilter` directives on top of the configured level.
fn init_logging(config: &AppConfig) {
    let directives = std::env::var("PEARLSHOP_LOG_FILTER").ok();
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(log_filter(&config.logging.level, directives.as_deref()))
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Configured level as the default directive; unparsable directives are skipped.
fn log_filter(level: &str, directives: Option<&str>) -> EnvFilter {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pearlshop_core::config::{ConfigOverrides, StorageBackend};
    use pearlshop_core::Section;
    use tracing::level_filters::LevelFilter;

    use super::{log_filter, Cli, Command};

    #[test]
    fn global_flags_become_config_overrides() {
        let cli = Cli::try_parse_from([
            "pearlshop",
            "count",
            "--storage",
            "memory",
            "--currency",
            "USD",
            "--default-section",
            "sets",
            "--max-quantity",
            "5",
            "--require-config",
        ])
        .expect("flags should parse");

        assert!(cli.require_config);
        assert!(matches!(cli.command, Command::Count));
        let overrides = ConfigOverrides::from(cli.overrides);
        assert_eq!(overrides.storage_backend, Some(StorageBackend::Memory));
        assert_eq!(overrides.currency.as_deref(), Some("USD"));
        assert_eq!(overrides.default_section, Some(Section::Sets));
        assert_eq!(overrides.max_selectable_quantity, Some(5));
        assert_eq!(overrides.storage_path, None);
    }

    #[test]
    fn negative_quantities_reach_the_command() {
        let cli = Cli::try_parse_from(["pearlshop", "set", "2", "-1"]).expect("parse");
        assert!(matches!(cli.command, Command::Set { value, .. } if value == "-1"));
    }

    #[test]
    fn log_filter_starts_from_the_configured_level() {
        assert_eq!(log_filter("debug", None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter("loud", None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter("warn", Some("trace")).max_level_hint(), Some(LevelFilter::TRACE));
        assert_eq!(
            log_filter("warn", Some("pearlshop_core=loud")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
