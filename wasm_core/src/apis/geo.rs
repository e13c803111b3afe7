//! IP geolocation through ipapi.co.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use super::client::fetch_json;
use super::{endpoint, ApiConfig};
use crate::error::{Result, ToolError};
use crate::{options_from_js, respond};

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GeoInfo {
    pub ip: String,
    pub version: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub continent_code: Option<String>,
    pub postal: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub utc_offset: Option<String>,
    pub currency: Option<String>,
    pub languages: Option<String>,
    pub asn: Option<String>,
    pub org: Option<String>,
}

/// Blank input looks up the caller's own address.
pub fn lookup_url(config: &ApiConfig, ip: &str) -> Result<String> {
    let ip = ip.trim();
    if ip.is_empty() {
        return Ok(endpoint(&config.ipapi, "json/"));
    }
    let address: IpAddr = ip
        .parse()
        .map_err(|_| ToolError::invalid(format!("invalid IP address: {ip}")))?;
    Ok(endpoint(&config.ipapi, &format!("{address}/json/")))
}

pub fn parse_geo(payload: Value) -> Result<GeoInfo> {
    if payload.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = payload
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("lookup failed");
        return Err(ToolError::Network(reason.to_string()));
    }
    Ok(serde_json::from_value(payload)?)
}

#[wasm_bindgen]
pub async fn ip_lookup(ip: String, config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        parse_geo(fetch_json(&lookup_url(&config, &ip)?).await?)
    }
    .await;
    respond("IP lookup", result)
}
