//! Localization for the site backend.
//!
//! - `language`: supported-language registry and the validated `Language` type
//! - `pack`: nested key-to-text language packs with dotted-path lookup
//! - `service`: the `Localizer` context object holding the active language,
//!   persisting the chosen code, tracking document direction, and notifying
//!   subscribers on switches
//!
//! The `Localizer` is injected into consumers rather than living in a global,
//! so it can be built against a mock pack server in tests.

mod language;
mod pack;
mod service;

pub use language::{supported_languages, Language, LanguageConfig};
pub use pack::LanguagePack;
pub use service::{DocumentState, Localizer, TextDirection};
