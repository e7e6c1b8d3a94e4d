//! # Sheets Feature
//!
//! Google Sheets access: the store interface the pipeline depends on and the
//! REST client implementing it. The sheet is the system's only persistence:
//! the "Notificado" and "Recordado" columns carry all cross-run memory.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod client;

pub use client::GoogleSheetsClient;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::error::StoreError;

/// One data row as column-name → cell-text. Short rows are padded with
/// empty strings at read time, so lookups never distinguish "missing cell"
/// from "empty cell".
pub type SheetRow = HashMap<String, String>;

/// Bulk read plus point writes against the spreadsheet.
///
/// A failed read aborts the run; a failed write is counted by the caller and
/// accepted as a consistency gap (the paired send already happened).
#[async_trait]
pub trait SpreadsheetStore {
    /// Read all data rows in sheet order.
    async fn read_rows(&self) -> Result<Vec<SheetRow>, StoreError>;

    /// Write one cell, addressed by 0-based data-row index and column name.
    /// Column resolution is case-insensitive: exact match first, then
    /// substring match in either direction.
    async fn write_cell(
        &self,
        row_index: usize,
        column: &str,
        value: &str,
    ) -> Result<(), StoreError>;
}
