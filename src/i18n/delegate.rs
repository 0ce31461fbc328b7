//! Framework-facing localization delegate.
//!
//! The host UI framework asks the delegate for a locale's resources. The
//! delegate picks the effective locale, makes it active on the provider and
//! triggers exactly one load through a [`LocaleHost`].

use crate::error::Result;
use crate::i18n::{Locale, LocaleProvider, TranslationTable};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The contract a UI framework expects from a localization resource provider.
#[async_trait]
pub trait LocalizationDelegate: Send + Sync {
    /// Whether the delegate can serve `locale`.
    fn is_supported(&self, locale: Option<&Locale>) -> bool;

    /// Load the resources for `locale` (or a resolved default).
    async fn load(&self, locale: Option<Locale>) -> Result<Option<TranslationTable>>;

    /// Whether resources must be reloaded after the delegate was replaced.
    fn should_reload(&self, _previous: &Self) -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// What a delegate needs from whatever owns the translations.
#[async_trait]
pub trait LocaleHost: Send + Sync {
    fn provider(&self) -> &LocaleProvider;

    /// Trigger a load of `locale`, which is already the active locale.
    async fn request_load(&self, locale: Locale) -> Result<Option<TranslationTable>>;
}

#[async_trait]
impl LocaleHost for LocaleProvider {
    fn provider(&self) -> &LocaleProvider {
        self
    }

    async fn request_load(&self, locale: Locale) -> Result<Option<TranslationTable>> {
        self.load(Some(locale)).await
    }
}

/// Delegate resolving locales in the fixed order: requested, persisted,
/// device default, first supported.
pub struct TranslationsDelegate<H: LocaleHost> {
    host: Arc<H>,
}

impl<H: LocaleHost> TranslationsDelegate<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Pick the locale a load should use.
    ///
    /// A persisted locale that is no longer supported, or that cannot be
    /// read back, is skipped.
    pub async fn resolve_locale(&self, requested: Option<Locale>) -> Result<Locale> {
        let provider = self.host.provider();

        if let Some(locale) = requested {
            debug!("Using requested locale {}", locale);
            return Ok(locale);
        }

        match provider.saved_locale().await {
            Ok(Some(saved)) if provider.is_supported(Some(&saved)) => {
                debug!("Using saved locale {}", saved);
                return Ok(saved);
            }
            Ok(Some(saved)) => {
                debug!("Saved locale {} is no longer supported, ignoring it", saved);
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read saved locale, falling back: {}", e),
        }

        Ok(provider.default_supported_locale())
    }
}

#[async_trait]
impl<H: LocaleHost> LocalizationDelegate for TranslationsDelegate<H> {
    fn is_supported(&self, locale: Option<&Locale>) -> bool {
        self.host.provider().is_supported(locale)
    }

    async fn load(&self, locale: Option<Locale>) -> Result<Option<TranslationTable>> {
        let locale = self.resolve_locale(locale).await?;
        self.host.provider().set_locale(locale.clone())?;
        info!("Loading translations for {}", locale);
        self.host.request_load(locale).await
    }
}

impl<H: LocaleHost> Clone for TranslationsDelegate<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}
