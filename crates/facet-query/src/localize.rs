//! Display-text extraction for localizable titles.

use crate::vocabulary::LocalizedText;

/// Turns localizable text into the string shown to the user
pub trait Localize {
    fn localize(&self, text: &LocalizedText) -> String;
}

impl<F> Localize for F
where
    F: Fn(&LocalizedText) -> String,
{
    fn localize(&self, text: &LocalizedText) -> String {
        self(text)
    }
}

/// Text of the first entry, whatever its locale
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstText;

impl Localize for FirstText {
    fn localize(&self, text: &LocalizedText) -> String {
        text.first_text().unwrap_or_default().to_string()
    }
}

/// Entry for one locale, falling back to the first entry
#[derive(Debug, Clone)]
pub struct PreferredLocale {
    locale: String,
}

impl PreferredLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl Localize for PreferredLocale {
    fn localize(&self, text: &LocalizedText) -> String {
        text.for_locale(&self.locale)
            .or_else(|| text.first_text())
            .unwrap_or_default()
            .to_string()
    }
}
