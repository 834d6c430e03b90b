use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the catalog REST API (e.g. `https://api.example.com/api/`)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the storefront site hosting `/cart/add/` and detail pages
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,

    /// Name of the cookie carrying the anti-forgery token
    #[serde(default = "default_csrf_cookie_name")]
    pub csrf_cookie_name: String,

    /// Cookies seeded into the client jar at startup (`name=value` pairs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,

    /// Image reference used when an item has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_image: Option<String>,

    /// How long the add-to-cart confirmation label stays visible
    #[serde(default = "default_confirm_delay_ms")]
    pub confirm_delay_ms: u64,

    /// Per-request timeout applied to the shared HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Enable debug logging to a file
    #[serde(default)]
    pub debug: bool,

    /// Debug log location (file or directory); defaults next to the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// Number of rotated log files to keep (0 keeps everything)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            site_base_url: default_site_base_url(),
            csrf_cookie_name: default_csrf_cookie_name(),
            cookies: Vec::new(),
            placeholder_image: None,
            confirm_delay_ms: default_confirm_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            debug: false,
            debug_log_path: None,
            debug_log_rotation: None,
            debug_log_keep: None,
        }
    }
}

impl Config {
    /// Image reference shown for items without one.
    pub fn placeholder_image(&self) -> String {
        match &self.placeholder_image {
            Some(image) => image.clone(),
            None => format!(
                "{}/static/images/no-image.jpg",
                self.site_base_url.trim_end_matches('/')
            ),
        }
    }

    /// Apply `TIENDA_*` environment overrides on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("TIENDA_API_BASE_URL") {
            if !value.trim().is_empty() {
                self.api_base_url = value.trim().to_string();
            }
        }
        if let Ok(value) = std::env::var("TIENDA_SITE_BASE_URL") {
            if !value.trim().is_empty() {
                self.site_base_url = value.trim().to_string();
            }
        }
    }
}

/// Debug log file rotation strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    /// Append to a single file
    None,
    /// One file per day
    Daily,
    /// One file per process run
    Session,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000/api/".to_string()
}

fn default_site_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_csrf_cookie_name() -> String {
    "csrftoken".to_string()
}

fn default_confirm_delay_ms() -> u64 {
    1500
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(r#"api_base_url = "https://api.shop.test/""#).unwrap();
        assert_eq!(config.api_base_url, "https://api.shop.test/");
        assert_eq!(config.csrf_cookie_name, "csrftoken");
        assert_eq!(config.confirm_delay_ms, 1500);
        assert!(!config.debug);
    }

    #[test]
    fn test_placeholder_falls_back_to_site_static() {
        let config = Config {
            site_base_url: "https://shop.test/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.placeholder_image(),
            "https://shop.test/static/images/no-image.jpg"
        );
    }

    #[test]
    fn test_rotation_parses_lowercase() {
        let config: Config = toml::from_str(r#"debug_log_rotation = "daily""#).unwrap();
        assert_eq!(config.debug_log_rotation, Some(DebugLogRotation::Daily));
    }
}
