//! Locale type: a language code optionally qualified by a country code.
//!
//! Comparison is ASCII case-insensitive and purely structural, so `en_us`,
//! `EN_US` and `en-US` all name the same locale.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator used in the persisted and manifest string forms.
const SEPARATOR: char = '_';

/// A language code with an optional country code.
#[derive(Debug, Clone, Eq)]
pub struct Locale {
    /// ISO 639 language code (e.g., "en", "es")
    language_code: String,

    /// ISO 3166 country code (e.g., "US"), if any
    country_code: Option<String>,
}

/// How a supported locale entry is matched against a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Match on language code only, even when the supported entry carries
    /// a country code. This is the historical behaviour and the default.
    #[default]
    LanguageOnly,

    /// Match on language code, and on country code when both sides carry one.
    Strict,
}

impl Locale {
    /// Create a language-only locale.
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            country_code: None,
        }
    }

    /// Create a locale with a country code.
    ///
    /// An empty country code yields a language-only locale.
    pub fn with_country(language_code: impl Into<String>, country_code: impl Into<String>) -> Self {
        let country_code = country_code.into();
        Self {
            language_code: language_code.into(),
            country_code: (!country_code.is_empty()).then_some(country_code),
        }
    }

    /// Parse a locale tag such as `en`, `en_US`, `en-US` or `en_US.UTF-8`.
    ///
    /// Script subtags (`zh-Hans-CN`) are skipped; the first two-letter or
    /// three-digit region subtag becomes the country code.
    ///
    /// # Returns
    /// * `Some(Locale)` if a non-empty language code is present
    /// * `None` for empty input, `C` and `POSIX`
    pub fn parse(tag: &str) -> Option<Locale> {
        let tag = tag
            .trim()
            .split(['.', '@'])
            .next()
            .unwrap_or_default();

        if tag.is_empty() || tag.eq_ignore_ascii_case("c") || tag.eq_ignore_ascii_case("posix") {
            return None;
        }

        let mut parts = tag.split(['_', '-']);
        let language = parts.next().filter(|lang| !lang.is_empty())?;
        let country = parts.find(|part| is_region_subtag(part));

        Some(match country {
            Some(country) => Locale::with_country(language, country),
            None => Locale::new(language),
        })
    }

    /// Decode the persisted `"{language}_{country}"` form.
    ///
    /// The country segment may be empty (trailing separator), which yields a
    /// language-only locale. An empty language segment decodes to `None`.
    pub fn from_persisted(value: &str) -> Option<Locale> {
        let mut segments = value.split(SEPARATOR);
        let language = segments.next().filter(|lang| !lang.is_empty())?;

        Some(match segments.next() {
            Some(country) if !country.is_empty() => Locale::with_country(language, country),
            _ => Locale::new(language),
        })
    }

    /// Encode as `"{language}_{country}"`, keeping the separator even when
    /// there is no country code.
    pub fn to_persisted(&self) -> String {
        format!(
            "{}{}{}",
            self.language_code,
            SEPARATOR,
            self.country_code.as_deref().unwrap_or_default()
        )
    }

    /// Get the language code.
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Get the country code, if any.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// Check whether this supported entry accepts `candidate`.
    ///
    /// # Arguments
    /// * `candidate` - The locale being tested
    /// * `policy` - Whether country codes take part in the comparison
    pub fn accepts(&self, candidate: &Locale, policy: MatchPolicy) -> bool {
        if !self.language_code.eq_ignore_ascii_case(&candidate.language_code) {
            return false;
        }

        match policy {
            MatchPolicy::LanguageOnly => true,
            MatchPolicy::Strict => match (self.country_code(), candidate.country_code()) {
                (Some(ours), Some(theirs)) => ours.eq_ignore_ascii_case(theirs),
                _ => true,
            },
        }
    }

    /// Check whether a manifest key names this locale.
    pub fn matches_key(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.to_string())
    }
}

fn is_region_subtag(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.language_code.eq_ignore_ascii_case(&other.language_code)
            && match (&self.country_code, &other.country_code) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl Hash for Locale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.language_code.to_ascii_lowercase().hash(state);
        self.country_code
            .as_ref()
            .map(|country| country.to_ascii_lowercase())
            .hash(state);
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country_code {
            Some(country) => write!(f, "{}{}{}", self.language_code, SEPARATOR, country),
            None => write!(f, "{}", self.language_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // ==================== Construction Tests ====================

    #[test]
    fn test_with_empty_country_is_language_only() {
        let locale = Locale::with_country("en", "");
        assert_eq!(locale.country_code(), None);
        assert_eq!(locale, Locale::new("en"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Locale::new("en").to_string(), "en");
        assert_eq!(Locale::with_country("en", "US").to_string(), "en_US");
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_parse_variants() {
        let expected = Locale::with_country("en", "US");
        assert_eq!(Locale::parse("en_US"), Some(expected.clone()));
        assert_eq!(Locale::parse("en-US"), Some(expected.clone()));
        assert_eq!(Locale::parse("en_US.UTF-8"), Some(expected.clone()));
        assert_eq!(Locale::parse(" en-us "), Some(expected));
        assert_eq!(Locale::parse("es"), Some(Locale::new("es")));
    }

    #[test]
    fn test_parse_skips_script_subtag() {
        let locale = Locale::parse("zh-Hans-CN").expect("Should parse");
        assert_eq!(locale.language_code(), "zh");
        assert_eq!(locale.country_code(), Some("CN"));
    }

    #[test]
    fn test_parse_rejects_empty_and_posix() {
        assert_eq!(Locale::parse(""), None);
        assert_eq!(Locale::parse("C"), None);
        assert_eq!(Locale::parse("POSIX"), None);
        assert_eq!(Locale::parse("_US"), None);
    }

    // ==================== Persisted Form Tests ====================

    #[test]
    fn test_to_persisted_keeps_trailing_separator() {
        assert_eq!(Locale::new("en").to_persisted(), "en_");
        assert_eq!(Locale::with_country("pt", "BR").to_persisted(), "pt_BR");
    }

    #[test]
    fn test_from_persisted() {
        assert_eq!(Locale::from_persisted("en_"), Some(Locale::new("en")));
        assert_eq!(Locale::from_persisted("en"), Some(Locale::new("en")));
        assert_eq!(
            Locale::from_persisted("pt_BR"),
            Some(Locale::with_country("pt", "BR"))
        );
        assert_eq!(Locale::from_persisted(""), None);
        assert_eq!(Locale::from_persisted("_BR"), None);
    }

    // ==================== Equality Tests ====================

    #[test]
    fn test_equality_is_case_insensitive() {
        assert_eq!(Locale::with_country("EN", "us"), Locale::with_country("en", "US"));
        assert_ne!(Locale::new("en"), Locale::with_country("en", "US"));
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(Locale::with_country("en", "US"));
        assert!(set.contains(&Locale::with_country("EN", "us")));
        assert!(!set.contains(&Locale::new("en")));
    }

    // ==================== Matching Tests ====================

    #[test]
    fn test_language_only_ignores_country() {
        let entry = Locale::with_country("en", "US");
        assert!(entry.accepts(&Locale::with_country("en", "GB"), MatchPolicy::LanguageOnly));
        assert!(entry.accepts(&Locale::new("EN"), MatchPolicy::LanguageOnly));
        assert!(!entry.accepts(&Locale::new("es"), MatchPolicy::LanguageOnly));
    }

    #[test]
    fn test_strict_compares_country_when_both_present() {
        let entry = Locale::with_country("en", "US");
        assert!(entry.accepts(&Locale::with_country("en", "us"), MatchPolicy::Strict));
        assert!(!entry.accepts(&Locale::with_country("en", "GB"), MatchPolicy::Strict));
        assert!(entry.accepts(&Locale::new("en"), MatchPolicy::Strict));
        assert!(Locale::new("en").accepts(&Locale::with_country("en", "GB"), MatchPolicy::Strict));
    }

    #[test]
    fn test_matches_key() {
        assert!(Locale::with_country("en", "US").matches_key("EN_us"));
        assert!(Locale::new("en").matches_key("en"));
        assert!(!Locale::with_country("en", "US").matches_key("en"));
        assert!(!Locale::new("en").matches_key("en_US"));
    }
}
