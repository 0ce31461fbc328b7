//! Manifest and translation file formats.
//!
//! The manifest maps locale strings to an ordered list of translation
//! files. Each file is a flat JSON object whose values are coerced to
//! strings when the file is parsed.

use crate::error::{I18nError, Result};
use crate::i18n::Locale;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat key to string mapping used for lookups.
pub type TranslationTable = BTreeMap<String, String>;

/// A single reference to a translation file inside the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    /// Merge every key of the file as-is.
    Plain(String),

    /// Merge every key of the file as `"{prefix}_{key}"`.
    Prefixed { prefix: String, filename: String },
}

impl ManifestEntry {
    /// File name, relative to the language directory.
    pub fn filename(&self) -> &str {
        match self {
            ManifestEntry::Plain(filename) => filename,
            ManifestEntry::Prefixed { filename, .. } => filename,
        }
    }

    /// Key prefix, present only for `Prefixed` entries (even when empty).
    pub fn prefix(&self) -> Option<&str> {
        match self {
            ManifestEntry::Plain(_) => None,
            ManifestEntry::Prefixed { prefix, .. } => Some(prefix),
        }
    }
}

/// Parsed manifest file. Locale keys keep the order of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    locales: Vec<(String, Vec<ManifestEntry>)>,
}

impl Manifest {
    /// Parse a manifest from its JSON text.
    ///
    /// # Arguments
    /// * `path` - Where the text came from, used in error reports
    /// * `text` - The raw JSON
    pub fn parse(path: &str, text: &str) -> Result<Self> {
        let parse_error = |source| I18nError::Parse {
            path: path.to_string(),
            source,
        };

        // serde_json's `preserve_order` keeps the object in file order
        let object: serde_json::Map<String, Value> =
            serde_json::from_str(text).map_err(parse_error)?;

        let locales = object
            .into_iter()
            .map(|(key, value)| {
                let entries = serde_json::from_value(value).map_err(parse_error)?;
                Ok((key, entries))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { locales })
    }

    /// Find the entries for a locale.
    ///
    /// Keys are compared case-insensitively against the locale's string form
    /// (`en` or `en_US`). There is no language-only fallback: `en_US` does
    /// not pick up an `en` key. When several keys match, the first in file
    /// order wins.
    pub fn entries_for(&self, locale: &Locale) -> Option<&[ManifestEntry]> {
        self.locales
            .iter()
            .find(|(key, _)| locale.matches_key(key))
            .map(|(_, entries)| entries.as_slice())
    }

    /// Locale keys declared by the manifest, in file order.
    pub fn locale_keys(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(|(key, _)| key.as_str())
    }
}

/// Compose the effective key for an optional prefix.
///
/// An empty prefix is treated the same as no prefix.
pub fn prefixed_key(key: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix, key),
        _ => key.to_string(),
    }
}

/// Parse a translation file into `(key, value)` pairs.
///
/// Strings are kept verbatim; any other JSON value is stored as its
/// compact JSON text (`42`, `true`, `null`).
pub fn parse_translation_file(path: &str, text: &str) -> Result<Vec<(String, String)>> {
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(text).map_err(|source| I18nError::Parse {
            path: path.to_string(),
            source,
        })?;

    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

/// Merge a parsed file into the accumulator, later values winning.
///
/// A prefixed entry always gets `"{prefix}_"` in front of its keys, so an
/// empty prefix yields `"_key"`.
pub fn merge_into(
    accumulator: &mut TranslationTable,
    pairs: Vec<(String, String)>,
    prefix: Option<&str>,
) {
    for (key, value) in pairs {
        let key = match prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key,
        };
        accumulator.insert(key, value);
    }
}
