use anyhow::{Context, Result};

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Display name used as the sender mailbox name and in the auto-reply signature
    pub site_name: String,

    /// Base URL the language packs are fetched from (GET {base}/{code}.json)
    pub i18n_base_url: String,

    /// File the chosen language code is persisted to across restarts
    pub language_pref_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            site_name: std::env::var("SITE_NAME")
                .unwrap_or_else(|_| "Garment Studio".to_string()),

            i18n_base_url: std::env::var("I18N_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/assets/i18n".to_string()),

            language_pref_file: std::env::var("LANGUAGE_PREF_FILE")
                .unwrap_or_else(|_| ".language".to_string()),
        })
    }
}

/// Mail transport configuration, read from the environment at request time.
///
/// All fields are required. A missing or malformed variable is a server
/// configuration error: the endpoint logs the detail and returns a generic
/// message, so the caller never learns which variable is absent.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// Destination mailbox for staff notifications
    pub to_email: String,
}

impl MailConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("SMTP_HOST").context("SMTP_HOST not set")?,
            port: std::env::var("SMTP_PORT")
                .context("SMTP_PORT not set")?
                .parse()
                .context("SMTP_PORT is not a valid port number")?,
            username: std::env::var("SMTP_USER").context("SMTP_USER not set")?,
            password: std::env::var("SMTP_PASS").context("SMTP_PASS not set")?,
            to_email: std::env::var("TO_EMAIL").context("TO_EMAIL not set")?,
        })
    }
}
