//! Rooms reference: premises number to unique premises identifier.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, trace};

use crate::error::Result;
use crate::models::config::ReferenceConfig;
use crate::models::document::RoomKey;
use crate::sheet::{open_sheets, Sheet};

/// Premises key to unique identifier.
pub type RoomIdentifierMap = HashMap<RoomKey, String>;

const COL_INSTITUTION_CODE: usize = 0;
const COL_ROOM_NUMBER: usize = 9;
const COL_OFFICE: usize = 10;
const COL_IDENTIFIER: usize = 13;

const OFFICE_PREFIX: &str = "оф. ";
const ANNEX_PREFIX: &str = "Пристройка";

/// Office number from a label such as `оф. 12 (пом. 3)`.
///
/// Annex labels and labels without the office prefix yield `None`.
pub fn parse_office_label(label: &str) -> Option<u32> {
    let label = label.trim();
    if label.starts_with(ANNEX_PREFIX) {
        return None;
    }
    let rest = label.strip_prefix(OFFICE_PREFIX)?;
    let number = match rest.find(" (") {
        Some(pos) => &rest[..pos],
        None => rest,
    };
    number.trim().parse().ok()
}

/// Parse one row of a rooms sheet.
pub fn parse_room_row(row: &[String], config: &ReferenceConfig) -> Option<(RoomKey, String)> {
    let cell = |col: usize| row.get(col).map(|c| c.trim()).unwrap_or("");

    if !cell(COL_INSTITUTION_CODE).starts_with(&config.institution_code_prefix) {
        return None;
    }

    let identifier = cell(COL_IDENTIFIER);
    if identifier.is_empty() {
        trace!("Room row without identifier: {:?}", row);
        return None;
    }

    let key = match (cell(COL_ROOM_NUMBER), cell(COL_OFFICE)) {
        ("", "") => return None,
        (_, office) if !office.is_empty() => RoomKey::office(parse_office_label(office)?),
        (room, _) => match room.parse() {
            Ok(number) => RoomKey::residential(number),
            Err(_) => {
                debug!("Unparsable room number '{}' for {}", room, identifier);
                return None;
            }
        },
    };

    Some((key, identifier.to_string()))
}

/// Build the rooms map from already opened sheets.
///
/// Sheets are expected to be pre-filtered by name. A later row with the same key
/// overrides an earlier one.
pub fn room_identifiers_from_sheets(sheets: &[Sheet], config: &ReferenceConfig) -> RoomIdentifierMap {
    let mut map = RoomIdentifierMap::new();
    for sheet in sheets {
        let before = map.len();
        for (_, row) in sheet.rows() {
            if let Some((key, identifier)) = parse_room_row(row, config) {
                map.insert(key, identifier);
            }
        }
        debug!("Sheet '{}': {} rooms", sheet.name(), map.len() - before);
    }
    map
}

/// Load the rooms workbook.
pub fn load_room_identifiers(path: &Path, config: &ReferenceConfig) -> Result<RoomIdentifierMap> {
    let prefix = config.rooms_sheet_prefix.as_str();
    let sheets = open_sheets(path, |name| name.starts_with(prefix))?;
    let map = room_identifiers_from_sheets(&sheets, config);
    info!(
        "Loaded {} room identifiers from {} sheet(s) of {}",
        map.len(),
        sheets.len(),
        path.display()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(code: &str, room: &str, office: &str, id: &str) -> Vec<String> {
        let mut cells = vec![String::new(); 14];
        cells[COL_INSTITUTION_CODE] = code.to_string();
        cells[COL_ROOM_NUMBER] = room.to_string();
        cells[COL_OFFICE] = office.to_string();
        cells[COL_IDENTIFIER] = id.to_string();
        cells
    }

    #[test]
    fn test_parse_office_label() {
        assert_eq!(parse_office_label("оф. 12"), Some(12));
        assert_eq!(parse_office_label("оф. 12 (пом. 3)"), Some(12));
        assert_eq!(parse_office_label("Пристройка оф. 1"), None);
        assert_eq!(parse_office_label("кладовая 4"), None);
    }

    #[test]
    fn test_parse_room_row() {
        let config = ReferenceConfig::default();
        assert_eq!(
            parse_room_row(&row("630049001", "57", "", "ID-57"), &config),
            Some((RoomKey::residential(57), "ID-57".to_string()))
        );
        assert_eq!(
            parse_room_row(&row("630049001", "3", "оф. 12 (пом. 3)", "ID-O12"), &config),
            Some((RoomKey::office(12), "ID-O12".to_string()))
        );
        assert_eq!(parse_room_row(&row("540001", "57", "", "ID-57"), &config), None);
        assert_eq!(
            parse_room_row(&row("630049001", "57", "Пристройка", "ID-57"), &config),
            None
        );
        assert_eq!(parse_room_row(&row("630049001", "кв", "", "ID"), &config), None);
        assert_eq!(parse_room_row(&row("630049001", "", "", "ID"), &config), None);
        assert_eq!(parse_room_row(&["630049".to_string()], &config), None);
    }

    #[test]
    fn test_office_row_without_room_number() {
        let config = ReferenceConfig::default();
        let sheets = vec![Sheet::new(
            "Идентификатор 1",
            vec![row("630049001", "", "оф. 12", "ID-O12")],
        )];

        let map = room_identifiers_from_sheets(&sheets, &config);
        assert_eq!(map.get(&RoomKey::office(12)).map(String::as_str), Some("ID-O12"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_room_identifiers_from_sheets() {
        let config = ReferenceConfig::default();
        let sheets = vec![
            Sheet::new("Идентификатор 1", vec![row("Код", "Номер", "", "Идентификатор"), row("630049001", "1", "", "A")]),
            Sheet::new("Идентификатор 2", vec![row("630049001", "2", "", "B"), row("630049001", "1", "", "C")]),
        ];

        let map = room_identifiers_from_sheets(&sheets, &config);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&RoomKey::residential(1)).map(String::as_str), Some("C"));
        assert_eq!(map.get(&RoomKey::residential(2)).map(String::as_str), Some("B"));
    }
}
