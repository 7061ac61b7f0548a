use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::{Config, SHEETS_API_URL};
use crate::error::{AppError, Result};
use crate::types::{AnnotatedEventRow, SHEET_HEADERS};

/// Writes the annotated table to a Google Sheets worksheet via the v4 REST
/// API. Every publish is a full overwrite: clear the range, then write the
/// header and all rows in canonical column order.
///
/// Takes an already-minted OAuth access token with spreadsheets scope;
/// credential exchange is the operator's concern, not this binary's.
/// Request body for the values update call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    range: String,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

pub struct SheetsPublisher {
    client: reqwest::Client,
    sheet_key: String,
    worksheet_name: String,
    token: String,
}

impl SheetsPublisher {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            sheet_key: cfg.sheet_key.clone(),
            worksheet_name: cfg.worksheet_name.clone(),
            token: cfg.sheets_token.clone(),
        })
    }

    pub async fn publish(&self, rows: &[AnnotatedEventRow]) -> Result<()> {
        self.clear().await?;

        let url = format!(
            "{}/{}/values/{}?valueInputOption=RAW",
            SHEETS_API_URL, self.sheet_key, self.worksheet_name
        );
        let body = ValueRange {
            range: self.worksheet_name.clone(),
            major_dimension: "ROWS",
            values: table_values(rows),
        };

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        check_status("values update", resp).await?;

        info!(
            rows = rows.len(),
            worksheet = %self.worksheet_name,
            "Published {} rows to worksheet {}",
            rows.len(),
            self.worksheet_name,
        );
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:clear",
            SHEETS_API_URL, self.sheet_key, self.worksheet_name
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check_status("values clear", resp).await
    }
}

async fn check_status(op: &str, resp: reqwest::Response) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AppError::Sheets(format!("{op} failed with {status}: {body}")))
}

/// Header row plus one cell row per event, in canonical column order.
pub fn table_values(rows: &[AnnotatedEventRow]) -> Vec<Vec<Value>> {
    let mut values = Vec::with_capacity(rows.len() + 1);
    values.push(SHEET_HEADERS.iter().map(|h| json!(h)).collect());
    values.extend(rows.iter().map(AnnotatedEventRow::cells));
    values
}

/// Tab-separated rendering of the table for dry runs.
pub fn table_tsv(rows: &[AnnotatedEventRow]) -> String {
    table_values(rows)
        .iter()
        .map(|row| {
            row.iter()
                .map(cell_text)
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run_pipeline;
    use serde_json::json;

    fn sample_rows() -> Vec<AnnotatedEventRow> {
        let page = json!({
            "events": [{
                "ticker": "E1",
                "markets": [{
                    "event_ticker": "E1",
                    "liquidity": 100, "liquidity_dollars": "1.00",
                    "market_type": "binary",
                    "no_ask": 0.60, "no_ask_dollars": 0.60,
                    "no_bid": 0.55, "no_bid_dollars": 0.55,
                    "no_sub_title": "No",
                    "title": "Sample",
                    "yes_ask": 0.45, "yes_ask_dollars": 0.45,
                    "yes_bid": 0.40, "yes_bid_dollars": 0.40,
                    "yes_sub_title": "Yes",
                }],
            }],
        });
        run_pipeline(&[page]).unwrap()
    }

    #[test]
    fn first_value_row_is_the_canonical_header() {
        let values = table_values(&sample_rows());
        assert_eq!(values.len(), 2);
        let headers: Vec<_> = values[0].iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(headers, SHEET_HEADERS.to_vec());
    }

    #[test]
    fn update_body_serializes_with_camel_case_keys() {
        let body = ValueRange {
            range: "Sheet1".to_string(),
            major_dimension: "ROWS",
            values: table_values(&sample_rows()),
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["range"], json!("Sheet1"));
        assert_eq!(v["majorDimension"], json!("ROWS"));
        assert_eq!(v["values"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn tsv_has_one_line_per_row_plus_header() {
        let tsv = table_tsv(&sample_rows());
        let lines: Vec<_> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("title_m1\t"));
        assert!(lines[1].starts_with("Sample\t"));
        assert_eq!(lines[1].split('\t').count(), SHEET_HEADERS.len());
    }
}
