//! # Feature: Google Sheets Client
//!
//! Sheets v4 REST client over reqwest with a bearer token from
//! configuration. Reads the whole range once per run and writes single
//! cells in A1 notation during the passes.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Multi-letter column support past Z
//! - 1.0.0: Initial release

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::core::config::SheetsConfig;
use crate::core::error::StoreError;
use crate::features::sheets::{SheetRow, SpreadsheetStore};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Header row fetch range; the sheet never grows past 26 columns.
const HEADER_RANGE: &str = "A1:Z1";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl GoogleSheetsClient {
    pub fn new(config: SheetsConfig) -> Self {
        GoogleSheetsClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get_values(&self, range: &str) -> Result<ValueRange, StoreError> {
        let url = format!("{}/{}/values/{}", SHEETS_API_BASE, self.config.sheet_id, range);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::UnexpectedResponse(e.to_string()))
    }

    async fn headers(&self) -> Result<Vec<String>, StoreError> {
        let range = self.get_values(HEADER_RANGE).await?;
        Ok(range.values.into_iter().next().unwrap_or_default())
    }

    /// Headers and configuration snapshot for the diagnostic mode.
    pub async fn diagnostic_info(&self) -> serde_json::Value {
        match self.headers().await {
            Ok(headers) => serde_json::json!({
                "configured": true,
                "sheet_id": self.config.sheet_id,
                "range": self.config.range,
                "columns_count": headers.len(),
                "headers": headers,
            }),
            Err(e) => serde_json::json!({
                "configured": false,
                "error": e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl SpreadsheetStore for GoogleSheetsClient {
    async fn read_rows(&self) -> Result<Vec<SheetRow>, StoreError> {
        debug!(
            "reading sheet {} range {}",
            self.config.sheet_id, self.config.range
        );
        let range = self.get_values(&self.config.range).await?;

        if range.values.is_empty() {
            warn!("sheet returned no rows");
            return Ok(Vec::new());
        }

        let rows = rows_to_maps(range.values);
        info!("read {} data rows from sheet", rows.len());
        Ok(rows)
    }

    async fn write_cell(
        &self,
        row_index: usize,
        column: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let headers = self.headers().await?;
        let column_index = find_column_index(&headers, column)
            .ok_or_else(|| StoreError::ColumnNotFound(column.to_string()))?;

        // +2: one for the header row, one for 1-based A1 rows
        let cell = format!("{}{}", column_letter(column_index), row_index + 2);
        debug!("writing {value:?} to cell {cell}");

        let url = format!(
            "{}/{}/values/{}?valueInputOption=RAW",
            SHEETS_API_BASE, self.config.sheet_id, cell
        );
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.config.api_token)
            .json(&serde_json::json!({ "values": [[value]] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        info!("cell {cell} updated");
        Ok(())
    }
}

/// Convert the raw value grid into header-keyed rows. The first row is the
/// header row; short data rows pad with empty strings.
fn rows_to_maps(values: Vec<Vec<String>>) -> Vec<SheetRow> {
    let mut iter = values.into_iter();
    let headers = match iter.next() {
        Some(headers) => headers,
        None => return Vec::new(),
    };

    iter.map(|row| {
        headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}

/// Resolve a column case-insensitively: exact match first, then substring
/// match in either direction.
fn find_column_index(headers: &[String], column: &str) -> Option<usize> {
    let needle = column.to_lowercase();

    headers
        .iter()
        .position(|header| header.to_lowercase() == needle)
        .or_else(|| {
            headers.iter().position(|header| {
                let header = header.to_lowercase();
                header.contains(&needle) || needle.contains(&header)
            })
        })
}

/// 0-based column index to A1 letters (0 → A, 25 → Z, 26 → AA).
fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index as i64;
    while remaining >= 0 {
        letters.push(b'A' + (remaining % 26) as u8);
        remaining = remaining / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
