use crate::config::Config;
use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;

/// HTTP session shared by the catalog and cart clients.
///
/// One `reqwest::Client` with a cookie jar: cookies set by the site (the
/// anti-forgery token among them) are replayed on later requests.
#[derive(Clone)]
pub struct StoreSession {
    client: Client,
    jar: Arc<Jar>,
    site_url: Url,
}

impl StoreSession {
    pub fn new(config: &Config) -> Result<Self> {
        let site_url = Url::parse(&config.site_base_url)
            .with_context(|| format!("Invalid site_base_url: {}", config.site_base_url))?;

        let jar = Arc::new(Jar::default());
        for cookie in &config.cookies {
            jar.add_cookie_str(cookie, &site_url);
        }

        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            site = %site_url,
            seeded_cookies = %crate::logging::redact_cookies(&config.cookies.join("; ")),
            "store session created"
        );

        Ok(Self { client, jar, site_url })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Value of the named cookie for the site, if the jar holds one.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.site_url)?;
        let header = header.to_str().ok()?;
        cookie_value(header, name)
    }
}

/// Look up `name` in a `Cookie` header string (`a=1; b=2`).
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
