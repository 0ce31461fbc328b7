//! Locale-based translation loading for UI applications.
//!
//! A [`LocaleProvider`](i18n::LocaleProvider) resolves the active locale
//! against a list of supported locales, loads the JSON translation files a
//! manifest names for it, answers key lookups and remembers the user's
//! choice across sessions. A [`TranslationsDelegate`](i18n::TranslationsDelegate)
//! plugs it into a UI framework's localization hook.

pub mod assets;
pub mod config;
pub mod device;
pub mod error;
pub mod i18n;
pub mod store;

pub use error::{I18nError, Result};
