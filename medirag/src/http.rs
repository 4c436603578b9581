use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;
use tracing::warn;

use crate::error::{Error, Result};

/// POSTs a JSON body and decodes the JSON reply. Uses the client's default timeout and never retries.
pub fn post_json<T: DeserializeOwned, B: Serialize>(
    url: &str,
    bearer: Option<&str>,
    body: &B,
) -> Result<T> {
    let client = Client::builder()
        .build()
        .map_err(|e| Error::remote(None, e.to_string()))?;
    let mut req = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .json(body);
    if let Some(token) = bearer {
        req = req.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let resp = req.send().map_err(|e| {
        warn!(url, error = %e, "request failed");
        Error::remote(None, format!("POST {} failed: {}", url, e))
    })?;
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    if !status.is_success() {
        warn!(url, status = status.as_u16(), "upstream returned an error");
        return Err(Error::remote(Some(status.as_u16()), text));
    }
    from_str::<T>(&text).map_err(|e| {
        Error::remote(
            Some(status.as_u16()),
            format!("POST {} decode failed: {} | {}", url, e, text),
        )
    })
}
