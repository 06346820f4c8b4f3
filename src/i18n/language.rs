use anyhow::{bail, Result};
use serde::Serialize;

/// Metadata for one supported language.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ar")
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Native name of the language
    pub native_name: &'static str,

    /// Flag glyph shown in the language picker
    pub flag: &'static str,

    /// Whether the language reads right-to-left
    pub rtl: bool,
}

/// The fixed set of supported languages. English is the default.
const SUPPORTED: &[LanguageConfig] = &[
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
        flag: "🇬🇧",
        rtl: false,
    },
    LanguageConfig {
        code: "ar",
        name: "Arabic",
        native_name: "العربية",
        flag: "🇪🇬",
        rtl: true,
    },
    LanguageConfig {
        code: "de",
        name: "German",
        native_name: "Deutsch",
        flag: "🇩🇪",
        rtl: false,
    },
    LanguageConfig {
        code: "tr",
        name: "Turkish",
        native_name: "Türkçe",
        flag: "🇹🇷",
        rtl: false,
    },
];

/// The static list of supported languages. Pure, no I/O.
pub fn supported_languages() -> &'static [LanguageConfig] {
    SUPPORTED
}

/// A language code validated against the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// Default language used when no preference has been persisted.
    pub const DEFAULT: Language = Language { code: "en" };

    /// Create a Language from a code string.
    ///
    /// Fails for codes outside the supported set, so an invalid persisted
    /// preference or API argument can never select a nonexistent pack.
    pub fn from_code(code: &str) -> Result<Language> {
        match SUPPORTED.iter().find(|lang| lang.code == code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn config(&self) -> &'static LanguageConfig {
        SUPPORTED
            .iter()
            .find(|lang| lang.code == self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_rtl(&self) -> bool {
        self.config().rtl
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::DEFAULT
    }
}
