//! Preview binary - resolves a locale the way the delegate does, loads it and
//! prints the resulting translations
//!
//! Usage:
//!   cargo run --bin preview                     # Resolve saved/device locale, print table
//!   cargo run --bin preview -- es               # Load a specific locale
//!   cargo run --bin preview -- es hi home_title # Print only the given keys
//!   cargo run --bin preview -- --save es        # Load and persist the locale
//!
//! Optional environment variables:
//! - LOCALE_LANG_DIR (defaults to assets/lang/)
//! - LOCALE_CONFIG_FILE (defaults to config.json)
//! - LOCALE_SUPPORTED (defaults to en)
//! - LOCALE_STRICT_MATCH (defaults to false)
//! - LOCALE_STORE_PATH (defaults to the platform config dir)

use anyhow::{Context, Result};
use locale_provider::assets::FsAssetReader;
use locale_provider::config::I18nConfig;
use locale_provider::device::SystemLocales;
use locale_provider::i18n::{Locale, LocaleProvider, LocalizationDelegate, TranslationsDelegate};
use locale_provider::store::{JsonFileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_provider=info".parse()?),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let save = match args.iter().position(|arg| arg == "--save") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };
    let requested = match args.first() {
        Some(tag) => Some(
            Locale::parse(tag).with_context(|| format!("Invalid locale tag '{}'", tag))?,
        ),
        None => None,
    };
    let keys: Vec<String> = args.into_iter().skip(1).collect();

    let config = I18nConfig::from_env()?;

    let store: Arc<dyn KeyValueStore> = match config
        .store_path
        .clone()
        .or_else(JsonFileStore::default_path)
    {
        Some(path) => {
            info!("Using preference file {}", path.display());
            Arc::new(JsonFileStore::new(path))
        }
        None => {
            warn!("No config directory available, preferences will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let provider = Arc::new(
        LocaleProvider::new(
            config,
            Arc::new(FsAssetReader::new()),
            store,
            Arc::new(SystemLocales),
        )
        .context("Failed to create locale provider")?,
    );

    let delegate = TranslationsDelegate::new(Arc::clone(&provider));
    let loaded = delegate
        .load(requested)
        .await
        .context("Failed to load translations")?;

    let locale = provider
        .locale()
        .context("Delegate did not set an active locale")?;

    println!("Active locale:        {}", locale);
    println!("Device default:       {}", provider.default_supported_locale());
    println!("Device preferred:     {}", provider.preferred_supported_locale());
    match provider.saved_locale().await? {
        Some(saved) => println!("Saved locale:         {}", saved),
        None => println!("Saved locale:         (none)"),
    }
    println!();

    if loaded.is_none() {
        println!("No translations found for {} in the manifest.", locale);
        return Ok(());
    }

    if keys.is_empty() {
        for (key, value) in provider.sentences() {
            println!("{:<32} {}", key, value);
        }
    } else {
        for key in &keys {
            println!("{:<32} {}", key, provider.t(key, None));
        }
    }

    if save {
        provider.save_locale(None).await?;
        println!("\nSaved {} as the preferred locale.", locale);
    }

    println!(
        "\n{}",
        serde_json::to_string_pretty(&provider.metrics()).context("Failed to encode metrics")?
    );
    Ok(())
}
