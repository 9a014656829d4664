use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::Translations;

/// Where the anti-forgery token was read from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CsrfSource {
    /// `csrfmiddlewaretoken` hidden input inside the form
    HiddenField(String),
    /// `csrftoken` cookie
    Cookie(String),
}

impl CsrfSource {
    pub fn token(&self) -> &str {
        match self {
            CsrfSource::HiddenField(token) | CsrfSource::Cookie(token) => token,
        }
    }
}

/// Inputs the hosting page supplies to the booking and reporting flows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageContext {
    pub resource_id: String,
    /// Per-night rate shown next to the nights count
    pub base_price: f64,
    pub login_url: String,
    pub authenticated: bool,
    /// Path of the page itself, used as the login `next` target
    pub current_path: String,
    /// Bed count of the resource, when the page exposes it
    pub max_guests: Option<u32>,
    pub csrf: Option<CsrfSource>,
    pub translations: Translations,
}

impl Default for PageContext {
    fn default() -> Self {
        Self {
            resource_id: String::new(),
            base_price: 0.0,
            login_url: "/accounts/login/".to_string(),
            authenticated: false,
            current_path: "/".to_string(),
            max_guests: None,
            csrf: None,
            translations: Translations::default(),
        }
    }
}

/// Templates render booleans as `True`/`False`
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Server location and client settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: Url,
    pub availability_path: String,
    pub create_path: String,
    pub report_path: String,
    pub timeout: Duration,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000/").expect("static url"),
            availability_path: "/reservations/check-availability/".to_string(),
            create_path: "/reservations/create-ajax/".to_string(),
            report_path: "/reporting/api/data/".to_string(),
            timeout: Duration::from_secs(30),
            output_dir: PathBuf::from("charts"),
        }
    }
}

impl AppConfig {
    /// Read `BOOKING_*` variables, loading `.env` first when present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup("BOOKING_BASE_URL") {
            config.base_url =
                Url::parse(&raw).with_context(|| format!("Invalid BOOKING_BASE_URL '{}'", raw))?;
        }
        if let Some(path) = lookup("BOOKING_AVAILABILITY_PATH") {
            config.availability_path = path;
        }
        if let Some(path) = lookup("BOOKING_CREATE_PATH") {
            config.create_path = path;
        }
        if let Some(path) = lookup("BOOKING_REPORT_PATH") {
            config.report_path = path;
        }
        if let Some(raw) = lookup("BOOKING_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("Invalid BOOKING_TIMEOUT_SECS '{}'", raw))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("BOOKING_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Cannot join '{}' onto {}", path, self.base_url))
    }
}

impl PageContext {
    /// Page context from `BOOKING_*` variables, for runs without a served page
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut page = Self::default();
        if let Some(id) = lookup("BOOKING_RESOURCE_ID") {
            page.resource_id = id;
        }
        if let Some(raw) = lookup("BOOKING_BASE_PRICE") {
            page.base_price = raw
                .parse()
                .with_context(|| format!("Invalid BOOKING_BASE_PRICE '{}'", raw))?;
        }
        if let Some(url) = lookup("BOOKING_LOGIN_URL") {
            page.login_url = url;
        }
        if let Some(raw) = lookup("BOOKING_AUTHENTICATED") {
            page.authenticated = parse_flag(&raw);
        }
        if let Some(path) = lookup("BOOKING_CURRENT_PATH") {
            page.current_path = path;
        }
        if let Some(raw) = lookup("BOOKING_MAX_GUESTS") {
            page.max_guests = Some(
                raw.parse()
                    .with_context(|| format!("Invalid BOOKING_MAX_GUESTS '{}'", raw))?,
            );
        }
        if let Some(token) = lookup("BOOKING_CSRF_TOKEN") {
            page.csrf = Some(CsrfSource::Cookie(token));
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn template_flags_become_booleans() {
        assert!(parse_flag("True"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("False"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn config_defaults_and_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BOOKING_BASE_URL", "https://mokki.example/"),
            ("BOOKING_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.endpoint(&config.availability_path).unwrap().as_str(),
            "https://mokki.example/reservations/check-availability/"
        );
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[("BOOKING_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn page_context_from_variables() {
        let page = PageContext::from_lookup(lookup(&[
            ("BOOKING_RESOURCE_ID", "3"),
            ("BOOKING_BASE_PRICE", "120.50"),
            ("BOOKING_AUTHENTICATED", "True"),
            ("BOOKING_CSRF_TOKEN", "abc"),
        ]))
        .unwrap();
        assert_eq!(page.resource_id, "3");
        assert_eq!(page.base_price, 120.5);
        assert!(page.authenticated);
        assert_eq!(page.csrf.as_ref().map(CsrfSource::token), Some("abc"));
    }
}
