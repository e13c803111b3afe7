//! Clients for the public JSON APIs behind the data lookup tools.
//!
//! Each submodule splits into pure request builders and response parsers,
//! which are unit tested against canned payloads, plus async wasm exports
//! that perform the request through [`client::fetch_json`].

pub mod client;
pub mod crypto;
pub mod currency;
pub mod food;
pub mod geo;
pub mod holidays;

use serde::Deserialize;

/// Base URLs of the upstream services. Pages may point any of them at a
/// proxy or a mock server; unset fields keep the public endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub coingecko: String,
    pub exchange_rates: String,
    pub ipapi: String,
    pub open_food_facts: String,
    pub nager_date: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            coingecko: "https://api.coingecko.com/api/v3".into(),
            exchange_rates: "https://api.exchangerate.host".into(),
            ipapi: "https://ipapi.co".into(),
            open_food_facts: "https://world.openfoodfacts.org".into(),
            nager_date: "https://date.nager.at".into(),
        }
    }
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(endpoint("https://a.test/", "/x/y"), "https://a.test/x/y");
        assert_eq!(endpoint("https://a.test", "x"), "https://a.test/x");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"ipapi": "http://localhost:9000"}"#).unwrap();
        assert_eq!(config.ipapi, "http://localhost:9000");
        assert_eq!(config.nager_date, ApiConfig::default().nager_date);
    }
}
