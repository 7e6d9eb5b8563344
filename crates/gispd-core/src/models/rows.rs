//! Output rows of the GIS ZHKH payment document export.
//!
//! Each row renders to a fixed-width sequence of [`CellValue`]s matching one of
//! the three export sheets.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::document::{CapitalRepair, DocumentHeader};

/// Document type written to the room sheet.
pub const DOCUMENT_TYPE_CURRENT: &str = "Текущий";

/// Name of the synthetic common-property aggregate service row.
pub const MAINTENANCE_SERVICE: &str = "Плата за содержание жилого помещения";

/// Consumption method written for common-property services.
pub const METERED_METHOD: &str = "Прибор учета";

/// Charge kind written to the penalty sheet.
pub const PENALTY_KIND: &str = "Пени";

/// Charge basis written to the penalty sheet.
pub const PENALTY_BASIS: &str = "Пени за просрочку коммунальный платежей";

/// Number of cells in a room row.
pub const ROOM_ROW_WIDTH: usize = 22;

/// Number of cells in a service row.
pub const SERVICE_ROW_WIDTH: usize = 29;

/// Number of cells in a penalty row.
pub const PENALTY_ROW_WIDTH: usize = 4;

/// A single typed output cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    /// Number written with two decimals (`0.00`).
    Amount(Decimal),
    /// Number written with digit grouping (`#,##0.00`).
    GroupedAmount(Decimal),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Plain-text rendering used for CSV and console output.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Amount(d) | CellValue::GroupedAmount(d) => fixed2(*d),
        }
    }
}

/// Format a decimal with exactly two fractional digits.
pub fn fixed2(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Row of the "Разделы 1-2" sheet: one per payment document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRow {
    /// GIS ZHKH account identifier (empty when the premises is unknown).
    pub gis_account: String,
    pub document_number: String,
    /// Billing period as `MM.YYYY`.
    pub period: String,
    pub payments_cutoff_day: u32,
    pub bik: String,
    pub bank_account: String,
    pub capital_repair: CapitalRepair,
    /// Document total.
    pub total: Decimal,
}

impl RoomRow {
    pub fn from_header(header: &DocumentHeader, payments_cutoff_day: u32) -> Self {
        Self {
            gis_account: header.gis_account.clone().unwrap_or_default(),
            document_number: header.document_number.clone(),
            period: header.period.display(),
            payments_cutoff_day,
            bik: header.bik.clone(),
            bank_account: header.bank_account.clone(),
            capital_repair: header.capital_repair.clone(),
            total: header.total,
        }
    }

    pub fn cells(&self) -> Vec<CellValue> {
        let kr = &self.capital_repair;
        vec![
            CellValue::text(&self.gis_account),
            CellValue::text(DOCUMENT_TYPE_CURRENT),
            CellValue::text(&self.document_number),
            CellValue::text(&self.period),
            // total, living and heated area, residents
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
            // prior debt, advance
            CellValue::Integer(0),
            CellValue::Integer(0),
            CellValue::Integer(i64::from(self.payments_cutoff_day)),
            CellValue::text(&self.bik),
            CellValue::text(&self.bank_account),
            CellValue::Text(fixed2(kr.rate)),
            CellValue::Text(fixed2(kr.charged)),
            kr.recalculation
                .map(|r| CellValue::Text(fixed2(r)))
                .unwrap_or(CellValue::Empty),
            // benefits, settlement order
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Text(fixed2(kr.total)),
            // payment document identifier
            CellValue::Empty,
            CellValue::Text(fixed2(self.total)),
            // additional information
            CellValue::Empty,
        ]
    }
}

/// Column positions of the "Разделы 3-6" sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceColumn {
    DocumentNumber,
    Service,
    IndividualMethod,
    IndividualVolume,
    CommonMethod,
    CommonVolume,
    Tariff,
    Charged,
    Coefficient,
    CoefficientExcess,
    Recalculation,
    Benefits,
    SettlementOrder,
    NormIndividual,
    NormCommon,
    MeterIndividual,
    MeterCollective,
    HouseVolumeRooms,
    HouseVolumeCommon,
    RecalculationBasis,
    AdjustmentSum,
    InstallmentCurrent,
    InstallmentPrior,
    InstallmentInterestRub,
    InstallmentInterestPercent,
    AmountDue,
    Total,
    IndividualUtility,
    CommonUtility,
}

impl ServiceColumn {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Figures of a service row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceDetail {
    /// Classified line item copied from the payment document.
    Charge {
        individual: bool,
        additional: bool,
        volume: Decimal,
        tariff: Decimal,
        charged: Decimal,
        recalculation: Decimal,
        amount_due: Decimal,
    },
    /// Aggregated common-property maintenance.
    Maintenance { tariff: Decimal, total: Decimal },
}

/// Row of the "Разделы 3-6" sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRow {
    pub document_number: String,
    pub service: String,
    pub detail: ServiceDetail,
}

impl ServiceRow {
    pub fn cells(&self) -> Vec<CellValue> {
        use ServiceColumn as C;

        let mut cells = vec![CellValue::Empty; SERVICE_ROW_WIDTH];
        let mut set = |column: ServiceColumn, value: CellValue| cells[column.index()] = value;

        set(C::DocumentNumber, CellValue::text(&self.document_number));
        set(C::Service, CellValue::text(&self.service));

        match &self.detail {
            ServiceDetail::Charge {
                individual,
                additional,
                volume,
                tariff,
                charged,
                recalculation,
                amount_due,
            } => {
                if *individual {
                    set(C::IndividualVolume, CellValue::Text(fixed2(*volume)));
                } else {
                    set(C::CommonMethod, CellValue::text(METERED_METHOD));
                    set(C::CommonVolume, CellValue::Text(fixed2(*volume)));
                }
                set(C::Tariff, CellValue::Amount(*tariff));
                set(C::Charged, CellValue::Amount(*charged));
                set(C::Recalculation, CellValue::Amount(*recalculation));
                set(C::InstallmentInterestRub, CellValue::Amount(Decimal::ZERO));
                set(C::InstallmentInterestPercent, CellValue::Amount(Decimal::ZERO));
                set(C::AmountDue, CellValue::Amount(*amount_due));
                if *individual {
                    set(C::Total, CellValue::Amount(*amount_due));
                }
                if *individual && !*additional {
                    set(C::IndividualUtility, CellValue::Amount(*amount_due));
                }
                if !*individual && !*additional {
                    set(C::CommonUtility, CellValue::Amount(*amount_due));
                }
            }
            ServiceDetail::Maintenance { tariff, total } => {
                set(C::Tariff, CellValue::Amount(*tariff));
                set(C::Total, CellValue::GroupedAmount(*total));
            }
        }

        cells
    }
}

/// Row of the "Неустойки" sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRow {
    pub document_number: String,
    pub amount: Decimal,
}

impl PenaltyRow {
    pub fn cells(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.document_number),
            CellValue::text(PENALTY_KIND),
            CellValue::text(PENALTY_BASIS),
            CellValue::Amount(self.amount),
        ]
    }
}

/// Everything emitted for one payment document.
///
/// Built completely before anything is written, so a document either lands in
/// the output as a whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExport {
    pub header: DocumentHeader,
    pub room: RoomRow,
    pub services: Vec<ServiceRow>,
    pub penalties: Vec<PenaltyRow>,
    /// Non-fatal issues found while extracting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DocumentExport {
    pub fn document_number(&self) -> &str {
        &self.header.document_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Period, RoomKey};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn header() -> DocumentHeader {
        let period = Period::new(3, 2024).unwrap();
        DocumentHeader {
            period,
            account: "77".to_string(),
            document_number: period.document_number("77"),
            room: RoomKey::residential(12),
            area: dec("44.5"),
            bank_account: "40702810000000000001".to_string(),
            bik: "045004001".to_string(),
            unique_id: Some("U-12".to_string()),
            gis_account: Some("ЖКУ-12".to_string()),
            capital_repair: CapitalRepair {
                rate: dec("9.5"),
                charged: dec("422.75"),
                recalculation: None,
                total: dec("422.75"),
            },
            total: dec("3210.4"),
        }
    }

    #[test]
    fn test_room_row_layout() {
        let cells = RoomRow::from_header(&header(), 31).cells();

        assert_eq!(cells.len(), ROOM_ROW_WIDTH);
        assert_eq!(cells[0], CellValue::text("ЖКУ-12"));
        assert_eq!(cells[1], CellValue::text("Текущий"));
        assert_eq!(cells[2], CellValue::text("240377"));
        assert_eq!(cells[3], CellValue::text("03.2024"));
        assert_eq!(cells[10], CellValue::Integer(31));
        assert_eq!(cells[11], CellValue::text("045004001"));
        assert_eq!(cells[13], CellValue::text("9.50"));
        assert!(cells[15].is_empty());
        assert_eq!(cells[18], CellValue::text("422.75"));
        assert_eq!(cells[20], CellValue::text("3210.40"));
    }

    #[test]
    fn test_room_row_recalculation_written_when_present() {
        let mut header = header();
        header.capital_repair.recalculation = Some(dec("-12.3"));
        let cells = RoomRow::from_header(&header, 31).cells();
        assert_eq!(cells[15], CellValue::text("-12.30"));
    }

    #[test]
    fn test_service_row_individual_columns() {
        let row = ServiceRow {
            document_number: "240377".to_string(),
            service: "Горячее водоснабжение".to_string(),
            detail: ServiceDetail::Charge {
                individual: true,
                additional: false,
                volume: dec("3"),
                tariff: dec("210.1"),
                charged: dec("630.3"),
                recalculation: Decimal::ZERO,
                amount_due: dec("630.3"),
            },
        };
        let cells = row.cells();

        assert_eq!(cells.len(), SERVICE_ROW_WIDTH);
        assert_eq!(cells[ServiceColumn::IndividualVolume.index()], CellValue::text("3.00"));
        assert!(cells[ServiceColumn::CommonMethod.index()].is_empty());
        assert_eq!(cells[ServiceColumn::Total.index()], CellValue::Amount(dec("630.3")));
        assert_eq!(
            cells[ServiceColumn::IndividualUtility.index()],
            CellValue::Amount(dec("630.3"))
        );
        assert!(cells[ServiceColumn::CommonUtility.index()].is_empty());
    }

    #[test]
    fn test_service_row_common_property_columns() {
        let row = ServiceRow {
            document_number: "240377".to_string(),
            service: "Холодная вода".to_string(),
            detail: ServiceDetail::Charge {
                individual: false,
                additional: false,
                volume: dec("0.12"),
                tariff: dec("40"),
                charged: dec("4.8"),
                recalculation: Decimal::ZERO,
                amount_due: dec("4.8"),
            },
        };
        let cells = row.cells();

        assert!(cells[ServiceColumn::IndividualVolume.index()].is_empty());
        assert_eq!(cells[ServiceColumn::CommonMethod.index()], CellValue::text(METERED_METHOD));
        assert_eq!(cells[ServiceColumn::CommonVolume.index()], CellValue::text("0.12"));
        assert!(cells[ServiceColumn::Total.index()].is_empty());
        assert_eq!(
            cells[ServiceColumn::CommonUtility.index()],
            CellValue::Amount(dec("4.8"))
        );
    }

    #[test]
    fn test_additional_service_skips_utility_split() {
        let row = ServiceRow {
            document_number: "240377".to_string(),
            service: "Запирающее устройство (ЗУ)".to_string(),
            detail: ServiceDetail::Charge {
                individual: true,
                additional: true,
                volume: dec("1"),
                tariff: dec("35"),
                charged: dec("35"),
                recalculation: Decimal::ZERO,
                amount_due: dec("35"),
            },
        };
        let cells = row.cells();

        assert_eq!(cells[ServiceColumn::Total.index()], CellValue::Amount(dec("35")));
        assert!(cells[ServiceColumn::IndividualUtility.index()].is_empty());
        assert!(cells[ServiceColumn::CommonUtility.index()].is_empty());
    }

    #[test]
    fn test_maintenance_row_layout() {
        let row = ServiceRow {
            document_number: "240377".to_string(),
            service: MAINTENANCE_SERVICE.to_string(),
            detail: ServiceDetail::Maintenance {
                tariff: dec("31.2"),
                total: dec("1390.4"),
            },
        };
        let cells = row.cells();

        let filled: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(
            filled,
            vec![
                ServiceColumn::DocumentNumber.index(),
                ServiceColumn::Service.index(),
                ServiceColumn::Tariff.index(),
                ServiceColumn::Total.index(),
            ]
        );
        assert_eq!(
            cells[ServiceColumn::Total.index()],
            CellValue::GroupedAmount(dec("1390.4"))
        );
    }

    #[test]
    fn test_penalty_row() {
        let row = PenaltyRow {
            document_number: "240377".to_string(),
            amount: dec("12.345"),
        };
        let cells = row.cells();
        assert_eq!(cells.len(), PENALTY_ROW_WIDTH);
        assert_eq!(cells[1], CellValue::text("Пени"));
        assert_eq!(cells[3].render(), "12.35");
    }
}
