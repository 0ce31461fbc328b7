//! Internationalization (i18n) module: locale resolution, translation
//! loading and lookup.
//!
//! # Architecture
//!
//! - `locale`: Case-insensitive `Locale` type and the supported-locale match policy
//! - `manifest`: Manifest and translation file formats, merge rules
//! - `provider`: `LocaleProvider`, owner of the live translation table
//! - `delegate`: Framework-facing delegate and the `LocaleHost` seam
//! - `events`: Event-driven host running loads on a background task
//! - `metrics`: Per-provider lookup and load counters
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_provider::i18n::{Locale, LocalizationDelegate, TranslationsDelegate};
//!
//! let delegate = TranslationsDelegate::new(provider.clone());
//! delegate.load(None).await?;
//! let greeting = provider.t("title", Some("home"));
//! ```

mod delegate;
mod events;
mod locale;
mod manifest;
mod metrics;
mod provider;

pub use delegate::{LocaleHost, LocalizationDelegate, TranslationsDelegate};
pub use events::{EventedLocaleProvider, LoadState, LocaleEvent};
pub use locale::{Locale, MatchPolicy};
pub use manifest::{prefixed_key, Manifest, ManifestEntry, TranslationTable};
pub use metrics::{LookupMetrics, MetricsReport};
pub use provider::{LocaleProvider, SAVED_LOCALE_KEY};
