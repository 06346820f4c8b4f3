//! Backend core for a garment manufacturer's marketing website: contact form
//! validation, mail relay over SMTP, and the localization service consumed by
//! the display layer.

pub mod config;
pub mod form;
pub mod i18n;
pub mod mailer;
pub mod server;
