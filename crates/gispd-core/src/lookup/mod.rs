//! Reference data loaded once per run.
//!
//! Two workbooks are chained: the rooms workbook maps premises to a unique
//! identifier, the accounts workbook maps that identifier to the GIS ZHKH
//! account. Both maps are read-only after loading.

pub mod accounts;
pub mod rooms;

use std::path::Path;

use tracing::warn;

pub use accounts::{accounts_from_sheet, load_accounts, parse_account_row, IdentifierAccountMap};
pub use rooms::{
    load_room_identifiers, parse_office_label, parse_room_row, room_identifiers_from_sheets,
    RoomIdentifierMap,
};

use crate::models::config::GispdConfig;
use crate::models::document::RoomKey;

/// Rooms and accounts reference maps.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    rooms: RoomIdentifierMap,
    accounts: IdentifierAccountMap,
}

impl ReferenceData {
    pub fn new(rooms: RoomIdentifierMap, accounts: IdentifierAccountMap) -> Self {
        Self { rooms, accounts }
    }

    /// Load both reference workbooks named in the configuration.
    ///
    /// A missing or unreadable workbook leaves its map empty; documents are
    /// still exported, only without identifiers.
    pub fn load(config: &GispdConfig) -> Self {
        let rooms = load_or_empty("rooms", &config.paths.rooms_file, |p| {
            load_room_identifiers(p, &config.reference)
        });
        let accounts = load_or_empty("accounts", &config.paths.accounts_file, |p| {
            load_accounts(p, &config.reference)
        });
        Self::new(rooms, accounts)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Unique identifier of the premises.
    pub fn unique_id(&self, room: &RoomKey) -> Option<&str> {
        self.rooms.get(room).map(String::as_str)
    }

    /// GIS ZHKH account of a unique identifier.
    pub fn account(&self, unique_id: &str) -> Option<&str> {
        self.accounts.get(unique_id).map(String::as_str)
    }
}

fn load_or_empty<T, F>(what: &str, path: &Path, load: F) -> T
where
    T: Default,
    F: FnOnce(&Path) -> crate::Result<T>,
{
    if !path.exists() {
        warn!("{} reference {} not found, continuing without it", what, path.display());
        return T::default();
    }
    match load(path) {
        Ok(map) => map,
        Err(e) => {
            warn!("Failed to load {} reference {}: {}", what, path.display(), e);
            T::default()
        }
    }
}
