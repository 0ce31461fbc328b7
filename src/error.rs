use crate::i18n::Locale;
use thiserror::Error;

/// Errors raised by the localization layer.
///
/// Soft misses (a locale missing from the manifest, an empty merge, an
/// untranslated key) are not errors and never show up here.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The provider was constructed without any supported locale.
    #[error("supported locales must not be empty")]
    EmptySupportedLocales,

    /// A locale outside the supported set was passed where a supported one is required.
    #[error("locale '{0}' is not supported")]
    UnsupportedLocale(Locale),

    /// No locale was given and none is active yet.
    #[error("no active locale to persist")]
    NoActiveLocale,

    /// An asset (manifest or translation file) could not be read.
    #[error("failed to read asset '{path}'")]
    AssetRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An asset was read but is not valid JSON of the expected shape.
    #[error("failed to parse '{path}'")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The event loop of an event-driven provider is no longer running.
    #[error("locale event loop is closed")]
    EventLoopClosed,

    /// The key-value store failed.
    #[error("preference store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, I18nError>;
