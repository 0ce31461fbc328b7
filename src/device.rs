//! Device locale queries.

use crate::i18n::Locale;
use tracing::debug;

/// Reports the locale(s) the device is configured for.
pub trait DeviceLocales: Send + Sync {
    /// The device's current locale, if it can be determined.
    fn current_locale(&self) -> Option<Locale>;

    /// The device's preferred locales, most preferred first.
    fn preferred_locales(&self) -> Vec<Locale>;
}

/// Queries the operating system through `sys-locale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocales;

impl DeviceLocales for SystemLocales {
    fn current_locale(&self) -> Option<Locale> {
        let tag = sys_locale::get_locale()?;
        let locale = Locale::parse(&tag);
        debug!("System locale '{}' parsed as {:?}", tag, locale);
        locale
    }

    fn preferred_locales(&self) -> Vec<Locale> {
        sys_locale::get_locales()
            .filter_map(|tag| Locale::parse(&tag))
            .collect()
    }
}

/// Fixed answers, for tests and hosts that already know the device locale.
#[derive(Debug, Clone, Default)]
pub struct FixedLocales {
    preferred: Vec<Locale>,
}

impl FixedLocales {
    /// The first entry is reported as the current locale.
    pub fn new(preferred: Vec<Locale>) -> Self {
        Self { preferred }
    }

    /// A device with no locale information at all.
    pub fn unknown() -> Self {
        Self::default()
    }
}

impl DeviceLocales for FixedLocales {
    fn current_locale(&self) -> Option<Locale> {
        self.preferred.first().cloned()
    }

    fn preferred_locales(&self) -> Vec<Locale> {
        self.preferred.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_locales() {
        let device = FixedLocales::new(vec![Locale::with_country("fr", "CA"), Locale::new("en")]);
        assert_eq!(device.current_locale(), Some(Locale::with_country("fr", "CA")));
        assert_eq!(device.preferred_locales().len(), 2);
    }

    #[test]
    fn test_fixed_unknown() {
        let device = FixedLocales::unknown();
        assert_eq!(device.current_locale(), None);
        assert!(device.preferred_locales().is_empty());
    }

    #[test]
    fn test_system_locales_parse_when_present() {
        // System dependent: only check that whatever is reported parses cleanly
        let device = SystemLocales;
        if let Some(locale) = device.current_locale() {
            assert!(!locale.language_code().is_empty());
        }
        for locale in device.preferred_locales() {
            assert!(!locale.language_code().is_empty());
        }
    }
}
