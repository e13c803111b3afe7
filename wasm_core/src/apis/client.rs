//! Shared HTTP helper. `reqwest` rides on `fetch` in the browser, so the
//! same code runs natively and in wasm.

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::error::{Result, ToolError};

const ERROR_BODY_LIMIT: usize = 200;

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// GETs `url` and decodes the JSON body. Non-2xx statuses become
/// `ToolError::Network`, malformed bodies `ToolError::Decode`.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    log::debug!("GET {url}");
    let response = reqwest::Client::new()
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ToolError::Network(format!(
            "{status}: {}",
            truncate(body.trim(), ERROR_BODY_LIMIT)
        )));
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
