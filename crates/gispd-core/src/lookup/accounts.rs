//! Accounts reference: unique premises identifier to GIS ZHKH account.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::config::ReferenceConfig;
use crate::sheet::{open_sheets, Sheet};

/// Unique identifier to GIS ZHKH account identifier.
pub type IdentifierAccountMap = HashMap<String, String>;

const COL_NUMBER: usize = 0;
const COL_ACCOUNT: usize = 2;
const COL_IDENTIFIER: usize = 3;
const HEADER_LABEL: &str = "Номер ЛС";

/// Parse one row of the accounts sheet into `(identifier, account)`.
///
/// Header rows carry the account label in the number or account column.
pub fn parse_account_row(row: &[String]) -> Option<(String, String)> {
    let cell = |col: usize| row.get(col).map(|c| c.trim()).unwrap_or("");

    if cell(COL_NUMBER) == HEADER_LABEL || cell(COL_ACCOUNT) == HEADER_LABEL {
        return None;
    }
    let account = cell(COL_ACCOUNT);
    let identifier = cell(COL_IDENTIFIER);
    if account.is_empty() || identifier.is_empty() {
        return None;
    }
    Some((identifier.to_string(), account.to_string()))
}

/// Build the accounts map from the export template sheet.
pub fn accounts_from_sheet(sheet: &Sheet) -> IdentifierAccountMap {
    sheet
        .rows()
        .filter_map(|(_, row)| parse_account_row(row))
        .collect()
}

/// Load the accounts workbook.
pub fn load_accounts(path: &Path, config: &ReferenceConfig) -> Result<IdentifierAccountMap> {
    let sheet_name = config.accounts_sheet.as_str();
    let sheets = open_sheets(path, |name| name == sheet_name)?;
    let map: IdentifierAccountMap = sheets.iter().flat_map(accounts_from_sheet).collect();
    info!("Loaded {} accounts from {}", map.len(), path.display());
    Ok(map)
}
