use crate::i18n::{supported_languages, Language, LanguageConfig, LanguagePack};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::{info, warn};

/// Reading direction applied at the document level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Document-level side effects of the active language: the `dir` and `lang`
/// attributes the frontend mirrors onto the root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentState {
    pub direction: TextDirection,
    pub lang: String,
}

struct ActiveState {
    language: Language,
    pack: Arc<LanguagePack>,
    document: DocumentState,
}

/// Holds the active language and translation pack for all display consumers.
///
/// One instance is created at startup and injected wherever text is looked
/// up. Reads take a shared lock and clone out of an `Arc`'d pack; a language
/// switch replaces the pack wholesale (never mutates it in place), persists
/// the chosen code, and notifies subscribers. Switches are rare, user
/// triggered, and last-wins.
pub struct Localizer {
    http: reqwest::Client,
    base_url: String,
    pref_path: PathBuf,
    state: RwLock<ActiveState>,
    changes: watch::Sender<Language>,
}

impl Localizer {
    pub fn new(base_url: impl Into<String>, pref_path: impl Into<PathBuf>) -> Self {
        let (changes, _) = watch::channel(Language::DEFAULT);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            pref_path: pref_path.into(),
            state: RwLock::new(ActiveState {
                language: Language::DEFAULT,
                pack: Arc::new(LanguagePack::empty()),
                document: DocumentState {
                    direction: TextDirection::Ltr,
                    lang: Language::DEFAULT.code().to_string(),
                },
            }),
            changes,
        }
    }

    /// Start from the persisted language preference, falling back to the
    /// default code, then load that pack. A failed initial load is logged and
    /// leaves the empty pack in place; lookups echo keys until a later switch
    /// succeeds.
    pub async fn init(&self) {
        let language = self
            .read_preference()
            .unwrap_or(Language::DEFAULT);
        let _ = self.load(language).await;
    }

    /// Fetch and activate the pack for `language`.
    ///
    /// On success the pack, active code, and document state are replaced
    /// under one lock write, the code is persisted, and subscribers are
    /// notified. On fetch or parse failure the previous state stays intact:
    /// the error is logged here and also returned for callers that care.
    pub async fn load(&self, language: Language) -> Result<()> {
        match self.fetch_pack(language).await {
            Ok(pack) => {
                {
                    let mut state = self.state.write().expect("localization lock poisoned");
                    state.language = language;
                    state.pack = Arc::new(pack);
                    state.document = DocumentState {
                        direction: if language.is_rtl() {
                            TextDirection::Rtl
                        } else {
                            TextDirection::Ltr
                        },
                        lang: language.code().to_string(),
                    };
                }
                self.persist_preference(language);
                self.changes.send_replace(language);
                info!("Language switched to {}", language.code());
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to load language pack '{}', keeping previous language: {:#}",
                    language.code(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Explicit user-triggered language change. Alias for `load` after
    /// resolving the code against the supported set.
    pub async fn switch_language(&self, code: &str) -> Result<()> {
        let language = Language::from_code(code)?;
        self.load(language).await
    }

    /// Look up a dotted key in the active pack.
    ///
    /// Never fails: an unknown key, a non-traversable node, or an empty leaf
    /// all fall back to echoing the key itself.
    pub fn get(&self, key: &str) -> String {
        let pack = {
            let state = self.state.read().expect("localization lock poisoned");
            Arc::clone(&state.pack)
        };
        pack.lookup(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    pub fn current_language(&self) -> Language {
        self.state
            .read()
            .expect("localization lock poisoned")
            .language
    }

    pub fn document(&self) -> DocumentState {
        self.state
            .read()
            .expect("localization lock poisoned")
            .document
            .clone()
    }

    /// The fixed supported-language list for language pickers.
    pub fn available_languages(&self) -> &'static [LanguageConfig] {
        supported_languages()
    }

    /// Observe language switches. The receiver yields the active language
    /// after every successful load.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.changes.subscribe()
    }

    async fn fetch_pack(&self, language: Language) -> Result<LanguagePack> {
        let url = format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            language.code()
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to request language pack")?;

        if !response.status().is_success() {
            anyhow::bail!("Language pack fetch failed ({}): {}", response.status(), url);
        }

        let tree: serde_json::Value = response
            .json()
            .await
            .context("Language pack is not valid JSON")?;

        Ok(LanguagePack::from_value(tree))
    }

    fn read_preference(&self) -> Option<Language> {
        let code = std::fs::read_to_string(&self.pref_path).ok()?;
        Language::from_code(code.trim()).ok()
    }

    /// Write failure is non-fatal: the switch already happened in memory, the
    /// preference just won't survive a restart.
    fn persist_preference(&self, language: Language) {
        if let Err(e) = std::fs::write(&self.pref_path, language.code()) {
            warn!(
                "Failed to persist language preference to {}: {}",
                self.pref_path.display(),
                e
            );
        }
    }
}
