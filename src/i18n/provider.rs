//! Locale provider: owns the translation table and the active locale.
//!
//! The provider resolves locales against its supported list, loads the
//! translation files a manifest names for a locale, answers key lookups and
//! persists the user's chosen locale.

use crate::assets::AssetReader;
use crate::config::I18nConfig;
use crate::device::DeviceLocales;
use crate::error::{I18nError, Result};
use crate::i18n::manifest::{merge_into, parse_translation_file, prefixed_key, Manifest};
use crate::i18n::{Locale, LookupMetrics, MatchPolicy, MetricsReport, TranslationTable};
use crate::store::KeyValueStore;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Preference key holding the persisted locale.
pub const SAVED_LOCALE_KEY: &str = "savedLocale";

/// Translation state for one application.
///
/// Construct one at startup and share it as `Arc<LocaleProvider>`.
pub struct LocaleProvider {
    config: I18nConfig,
    assets: Arc<dyn AssetReader>,
    store: Arc<dyn KeyValueStore>,
    device: Arc<dyn DeviceLocales>,
    sentences: RwLock<TranslationTable>,
    locale: RwLock<Option<Locale>>,
    load_gate: Mutex<()>,
    metrics: LookupMetrics,
}

impl LocaleProvider {
    /// Create a provider.
    ///
    /// # Returns
    /// * `Err(I18nError::EmptySupportedLocales)` if the config lists no locale
    pub fn new(
        config: I18nConfig,
        assets: Arc<dyn AssetReader>,
        store: Arc<dyn KeyValueStore>,
        device: Arc<dyn DeviceLocales>,
    ) -> Result<Self> {
        if config.supported_locales.is_empty() {
            return Err(I18nError::EmptySupportedLocales);
        }

        Ok(Self {
            config,
            assets,
            store,
            device,
            sentences: RwLock::new(TranslationTable::new()),
            locale: RwLock::new(None),
            load_gate: Mutex::new(()),
            metrics: LookupMetrics::new(),
        })
    }

    // ==================== State ====================

    /// The configuration this provider was built with.
    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    /// Supported locales, in priority order.
    pub fn supported_locales(&self) -> &[Locale] {
        &self.config.supported_locales
    }

    /// How candidate locales are compared with supported entries.
    pub fn match_policy(&self) -> MatchPolicy {
        self.config.match_policy
    }

    /// The fallback locale: the first supported entry.
    pub fn first_supported(&self) -> &Locale {
        // Non-empty is checked in `new`
        &self.config.supported_locales[0]
    }

    /// The active locale, if one has been set.
    pub fn locale(&self) -> Option<Locale> {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the active locale.
    ///
    /// # Returns
    /// * `Err(I18nError::UnsupportedLocale)` if the locale is not supported
    pub fn set_locale(&self, locale: Locale) -> Result<()> {
        if !self.is_supported(Some(&locale)) {
            return Err(I18nError::UnsupportedLocale(locale));
        }

        debug!("Active locale set to {}", locale);
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = Some(locale);
        Ok(())
    }

    /// Whether a non-empty translation table is loaded.
    pub fn is_loaded(&self) -> bool {
        !self
            .sentences
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Snapshot of the live translation table.
    pub fn sentences(&self) -> TranslationTable {
        self.sentences
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    // ==================== Resolution ====================

    /// Check whether a locale is supported.
    ///
    /// Under `MatchPolicy::LanguageOnly` an entry such as `en_US` accepts any
    /// `en` locale, whatever its country.
    pub fn is_supported(&self, locale: Option<&Locale>) -> bool {
        let Some(locale) = locale else {
            return false;
        };

        self.supported_locales()
            .iter()
            .any(|entry| entry.accepts(locale, self.match_policy()))
    }

    /// Resolve a locale to a supported one.
    ///
    /// # Arguments
    /// * `locale` - The requested locale; `None` yields the first supported locale
    /// * `candidates` - Entries to scan in order; defaults to the supported locales
    ///
    /// # Returns
    /// The first compatible candidate, or the first supported locale.
    pub fn resolve_supported_locale(
        &self,
        locale: Option<&Locale>,
        candidates: Option<&[Locale]>,
    ) -> Locale {
        let Some(locale) = locale else {
            debug!(
                "No locale to resolve, using first supported locale {}",
                self.first_supported()
            );
            return self.first_supported().clone();
        };

        let candidates = candidates.unwrap_or_else(|| self.supported_locales());
        candidates
            .iter()
            .find(|entry| entry.accepts(locale, self.match_policy()))
            .cloned()
            .unwrap_or_else(|| {
                debug!(
                    "Locale {} not supported, using first supported locale {}",
                    locale,
                    self.first_supported()
                );
                self.first_supported().clone()
            })
    }

    /// The device's current locale resolved to a supported one.
    pub fn default_supported_locale(&self) -> Locale {
        let current = self.device.current_locale();
        self.resolve_supported_locale(current.as_ref(), None)
    }

    /// The first device-preferred locale that is supported, resolved to its
    /// supported entry, or the first supported locale.
    pub fn preferred_supported_locale(&self) -> Locale {
        self.device
            .preferred_locales()
            .iter()
            .find(|locale| self.is_supported(Some(*locale)))
            .map(|locale| self.resolve_supported_locale(Some(locale), None))
            .unwrap_or_else(|| self.first_supported().clone())
    }

    // ==================== Loading ====================

    /// Load the translations for a locale and make them live.
    ///
    /// Defaults to the active locale, or the first supported one when no
    /// locale is active yet. Loads are serialized: a second call waits for
    /// the first to finish.
    ///
    /// # Returns
    /// * `Ok(Some(table))` when the table was replaced
    /// * `Ok(None)` when the manifest has no entry for the locale or the
    ///   merged files are empty; the previous table stays live
    /// * `Err(_)` when the manifest or a translation file cannot be read or
    ///   parsed; the previous table stays live
    pub async fn load(&self, locale: Option<Locale>) -> Result<Option<TranslationTable>> {
        let _gate = self.load_gate.lock().await;

        let locale = locale
            .or_else(|| self.locale())
            .unwrap_or_else(|| self.first_supported().clone());

        match self.load_locale(&locale).await {
            Ok(Some(table)) => {
                self.metrics.record_load();
                info!("Loaded {} translation(s) for {}", table.len(), locale);
                Ok(Some(table))
            }
            Ok(None) => {
                self.metrics.record_soft_miss();
                Ok(None)
            }
            Err(e) => {
                self.metrics.record_load_failure();
                warn!("Failed to load translations for {}: {}", locale, e);
                Err(e)
            }
        }
    }

    async fn load_locale(&self, locale: &Locale) -> Result<Option<TranslationTable>> {
        let manifest_path = self.config.manifest_path();
        let manifest_text = self.assets.read_text(&manifest_path).await?;
        let manifest = Manifest::parse(&manifest_path, &manifest_text)?;

        let Some(entries) = manifest.entries_for(locale) else {
            warn!("No manifest entry for locale {} in {}", locale, manifest_path);
            return Ok(None);
        };

        let mut accumulator = TranslationTable::new();
        for entry in entries {
            let path = self.config.asset_path(entry.filename());
            let text = self.assets.read_text(&path).await?;
            let pairs = parse_translation_file(&path, &text)?;
            debug!(
                "Merging {} key(s) from {} (prefix: {:?})",
                pairs.len(),
                path,
                entry.prefix()
            );
            merge_into(&mut accumulator, pairs, entry.prefix());
        }

        if accumulator.is_empty() {
            warn!("Translations for {} are empty, keeping current table", locale);
            return Ok(None);
        }

        let mut sentences = self.sentences.write().unwrap_or_else(PoisonError::into_inner);
        sentences.clear();
        sentences.extend(accumulator.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Some(accumulator))
    }

    // ==================== Lookup ====================

    /// Translate a key.
    ///
    /// With a non-empty prefix the key looked up is `"{prefix}_{key}"`.
    /// A missing translation yields the looked-up key itself.
    pub fn t(&self, key: &str, prefix: Option<&str>) -> String {
        let key = prefixed_key(key, prefix);
        let sentences = self.sentences.read().unwrap_or_else(PoisonError::into_inner);

        match sentences.get(&key) {
            Some(value) => {
                self.metrics.record_hit();
                value.clone()
            }
            None => {
                self.metrics.record_miss();
                key
            }
        }
    }

    // ==================== Persistence ====================

    /// Persist a locale, defaulting to the active one.
    ///
    /// The stored form is `"{language}_{country}"`; a language-only locale is
    /// stored with a trailing separator (`"en_"`).
    pub async fn save_locale(&self, locale: Option<&Locale>) -> Result<()> {
        let locale = match locale {
            Some(locale) => locale.clone(),
            None => self.locale().ok_or(I18nError::NoActiveLocale)?,
        };

        if !self.is_supported(Some(&locale)) {
            return Err(I18nError::UnsupportedLocale(locale));
        }

        self.store
            .set_string(SAVED_LOCALE_KEY, &locale.to_persisted())
            .await?;
        info!("Saved locale {}", locale);
        Ok(())
    }

    /// Read the persisted locale, if any.
    pub async fn saved_locale(&self) -> Result<Option<Locale>> {
        let value = self.store.get_string(SAVED_LOCALE_KEY).await?;
        Ok(value.as_deref().and_then(Locale::from_persisted))
    }

    /// Forget the persisted locale. Succeeds when nothing is stored.
    pub async fn delete_saved_locale(&self) -> Result<()> {
        self.store.remove(SAVED_LOCALE_KEY).await?;
        debug!("Deleted saved locale");
        Ok(())
    }
}

impl std::fmt::Debug for LocaleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleProvider")
            .field("supported_locales", &self.supported_locales())
            .field("locale", &self.locale())
            .field("loaded_keys", &self.sentences.read().map(|s| s.len()).ok())
            .finish_non_exhaustive()
    }
}
