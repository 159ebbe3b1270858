use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const AGENT: &str = concat!("matchday_odds/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Blocking GET returning the body of a successful response.
pub fn get_json(client: &Client, url: &str, query: &[(&str, String)]) -> Result<String> {
    let resp = client
        .get(url)
        .query(query)
        .header(USER_AGENT, AGENT)
        .header(ACCEPT, "application/json")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    debug!(url, %status, bytes = body.len(), "upstream response");
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, truncate(&body, 200)));
    }
    Ok(body)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
