use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::{Config, MAX_PAGES};
use crate::error::{AppError, Result};

#[derive(Debug, Default)]
pub struct FetchStats {
    pub pages: usize,
    pub api_events: usize,
    pub api_markets: usize,
}

/// Fetch all open events (with nested markets) from the Kalshi events
/// endpoint, following the cursor until exhausted. Pages are returned in
/// fetch order — the pipeline's tie-break depends on it.
pub async fn fetch_event_pages(cfg: &Config) -> Result<(Vec<Value>, FetchStats)> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut pages = Vec::new();
    let mut stats = FetchStats::default();
    let mut cursor: Option<String> = None;

    loop {
        let resp: Value = page_request(&client, &cfg.events_url, cfg.page_limit, cursor.as_deref())
            .send()
            .await?
            .json()
            .await?;

        let events_len = resp
            .get("events")
            .and_then(|e| e.as_array())
            .map(|a| a.len())
            .ok_or_else(|| AppError::MissingField("events".to_string()))?;
        let markets_len = count_markets(&resp);

        stats.pages += 1;
        stats.api_events += events_len;
        stats.api_markets += markets_len;
        info!(
            page = stats.pages,
            events = events_len,
            "Fetched {} events, total: {} markets.",
            events_len,
            stats.api_markets,
        );

        cursor = page_cursor(&resp);
        pages.push(resp);

        if cursor.is_none() {
            break;
        }
        if stats.pages >= MAX_PAGES {
            warn!(
                pages = stats.pages,
                "Page cap reached with cursor still present; returning partial data"
            );
            break;
        }
    }

    Ok((pages, stats))
}

/// Build one page request. Query parameters go through reqwest's builder so
/// the cursor is percent-encoded rather than spliced into the URL.
fn page_request(
    client: &reqwest::Client,
    events_url: &str,
    limit: usize,
    cursor: Option<&str>,
) -> reqwest::RequestBuilder {
    let mut req = client
        .get(events_url)
        .query(&[("limit", limit.to_string())])
        .query(&[("with_nested_markets", "true"), ("status", "open")]);
    if let Some(c) = cursor {
        req = req.query(&[("cursor", c)]);
    }
    req
}

/// The next-page cursor, if the payload carries a non-empty one.
pub fn page_cursor(page: &Value) -> Option<String> {
    page.get("cursor")
        .and_then(|c| c.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn count_markets(page: &Value) -> usize {
    page.get("events")
        .and_then(|e| e.as_array())
        .map(|events| {
            events
                .iter()
                .filter_map(|e| e.get("markets").and_then(|m| m.as_array()))
                .map(|m| m.len())
                .sum()
        })
        .unwrap_or(0)
}
