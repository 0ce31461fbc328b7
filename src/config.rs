use crate::i18n::{Locale, MatchPolicy};
use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct I18nConfig {
    // Assets
    pub lang_directory: String,
    pub lang_config_file: String,

    // Locales
    pub supported_locales: Vec<Locale>,
    pub match_policy: MatchPolicy,

    // Persistence
    pub store_path: Option<PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            lang_directory: "assets/lang/".to_string(),
            lang_config_file: "config.json".to_string(),
            supported_locales: vec![Locale::new("en")],
            match_policy: MatchPolicy::LanguageOnly,
            store_path: None,
        }
    }
}

impl I18nConfig {
    /// Start from the defaults with an explicit supported locale list.
    pub fn with_locales(supported_locales: Vec<Locale>) -> Self {
        Self {
            supported_locales,
            ..Self::default()
        }
    }

    /// Build a config from `LOCALE_*` environment variables, falling back to
    /// the defaults for any that are unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            // Assets - the directory is concatenated with file names as-is
            lang_directory: std::env::var("LOCALE_LANG_DIR").unwrap_or(defaults.lang_directory),
            lang_config_file: std::env::var("LOCALE_CONFIG_FILE")
                .unwrap_or(defaults.lang_config_file),

            // Locales
            supported_locales: match std::env::var("LOCALE_SUPPORTED") {
                Ok(list) => parse_locale_list(&list)?,
                Err(_) => defaults.supported_locales,
            },
            match_policy: std::env::var("LOCALE_STRICT_MATCH")
                .ok()
                .map(|v| {
                    if matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                        MatchPolicy::Strict
                    } else {
                        MatchPolicy::LanguageOnly
                    }
                })
                .unwrap_or_default(),

            // Persistence
            store_path: std::env::var("LOCALE_STORE_PATH").ok().map(PathBuf::from),
        })
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> String {
        format!("{}{}", self.lang_directory, self.lang_config_file)
    }

    /// Path of a translation file named by the manifest.
    pub fn asset_path(&self, filename: &str) -> String {
        format!("{}{}", self.lang_directory, filename)
    }
}

/// Parse a comma separated locale list such as `en_US, es, pt-BR`.
fn parse_locale_list(list: &str) -> Result<Vec<Locale>> {
    let mut locales = Vec::new();
    for tag in list.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        match Locale::parse(tag) {
            Some(locale) => locales.push(locale),
            None => bail!("Invalid locale tag in LOCALE_SUPPORTED: '{}'", tag),
        }
    }

    if locales.is_empty() {
        bail!("LOCALE_SUPPORTED is set but lists no locales");
    }
    Ok(locales)
}
