use crate::error::{AppError, Result};

pub const EVENTS_URL: &str = "https://api.elections.kalshi.com/trade-api/v2/events";
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Safety cap on cursor-paginated fetches. The open-events listing is a few
/// hundred pages at most; hitting this cap means the cursor stopped advancing.
pub const MAX_PAGES: usize = 1000;

/// Spread at or below this rates an event "High" liquidity.
pub const HIGH_LIQUIDITY_SPREAD_MAX: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct Config {
    pub events_url: String,
    pub log_level: String,
    /// Records per page on the events endpoint (PAGE_LIMIT)
    pub page_limit: usize,
    /// Google Sheets spreadsheet key (SHEET_KEY)
    pub sheet_key: String,
    /// Worksheet tab to overwrite (WORKSHEET_NAME)
    pub worksheet_name: String,
    /// Pre-minted OAuth access token with spreadsheets scope (SHEETS_TOKEN)
    pub sheets_token: String,
    /// Skip the Sheets write and dump the table as TSV to stdout (DRY_RUN=1)
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dry_run = matches!(
            std::env::var("DRY_RUN").as_deref(),
            Ok("1") | Ok("true") | Ok("yes")
        );

        let cfg = Self {
            events_url: std::env::var("EVENTS_URL").unwrap_or_else(|_| EVENTS_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            page_limit: parse_page_limit(
                &std::env::var("PAGE_LIMIT").unwrap_or_else(|_| "200".to_string()),
            )?,
            sheet_key: std::env::var("SHEET_KEY").unwrap_or_default(),
            worksheet_name: std::env::var("WORKSHEET_NAME").unwrap_or_else(|_| "Sheet1".to_string()),
            sheets_token: std::env::var("SHEETS_TOKEN").unwrap_or_default(),
            dry_run,
        };

        if !cfg.dry_run {
            if cfg.sheet_key.is_empty() {
                return Err(AppError::Config(
                    "SHEET_KEY must be set (or run with DRY_RUN=1)".to_string(),
                ));
            }
            if cfg.sheets_token.is_empty() {
                return Err(AppError::Config(
                    "SHEETS_TOKEN must be set (or run with DRY_RUN=1)".to_string(),
                ));
            }
        }

        Ok(cfg)
    }
}

/// A zero limit would request empty pages forever, so it is rejected along
/// with anything unparsable.
fn parse_page_limit(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Config(
            "PAGE_LIMIT must be a positive integer".to_string(),
        )),
    }
}
