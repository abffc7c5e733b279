/// Runtime configuration
///
/// Values come from environment variables, falling back to defaults that
/// match a gallery server running locally on port 8000.
use std::time::Duration;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_STATUS_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the gallery server (`/api/...` is appended)
    pub server_url: String,
    /// Base URL of a Nominatim-compatible geocoder
    pub geocoder_url: String,
    /// User-Agent sent with every request (Nominatim rejects anonymous clients)
    pub user_agent: String,
    /// How long a status message stays visible
    pub status_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: format!("geogallery/{}", env!("CARGO_PKG_VERSION")),
            status_timeout: Duration::from_secs(DEFAULT_STATUS_SECS),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    /// Unset, empty, or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let server_url = read("GEOGALLERY_SERVER_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.server_url);
        let geocoder_url = read("GEOGALLERY_GEOCODER_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.geocoder_url);
        let user_agent = read("GEOGALLERY_USER_AGENT").unwrap_or(defaults.user_agent);
        let status_timeout = read("GEOGALLERY_STATUS_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.status_timeout);

        Self {
            server_url,
            geocoder_url,
            user_agent,
            status_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.status_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GEOGALLERY_SERVER_URL", "http://gallery.local:9000/"),
            ("GEOGALLERY_STATUS_SECS", "2"),
        ]));
        assert_eq!(config.server_url, "http://gallery.local:9000");
        assert_eq!(config.status_timeout, Duration::from_secs(2));
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
    }

    #[test]
    fn test_bad_number_keeps_default() {
        let config = AppConfig::from_lookup(lookup_from(&[("GEOGALLERY_STATUS_SECS", "soon")]));
        assert_eq!(config.status_timeout, Duration::from_secs(DEFAULT_STATUS_SECS));
    }
}
