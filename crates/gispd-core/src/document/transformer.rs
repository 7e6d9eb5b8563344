//! Payment document to GIS ZHKH rows.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::lookup::ReferenceData;
use crate::models::config::GispdConfig;
use crate::models::document::{CapitalRepair, DocumentHeader, RoomKey};
use crate::models::rows::{
    fixed2, DocumentExport, PenaltyRow, RoomRow, ServiceDetail, ServiceRow, MAINTENANCE_SERVICE,
};
use crate::sheet::Sheet;

use super::rules::{
    columns, fields, locate_with_fallback, parse_amount, parse_period, read_amount, simple_name,
    AmountCell, RowLabelIndex, ServiceClassifier, LABEL_CAPITAL_REPAIR, LABEL_SERVICES,
    LABEL_TOTAL, LEADING_NUMBER, SERVICE_MAINTENANCE, SERVICE_PENALTY,
};
use super::Result;

/// Trait for payment document transformation.
pub trait DocumentParser {
    /// Transform the body sheet of one payment document.
    fn transform(&self, sheet: &Sheet, references: &ReferenceData) -> Result<DocumentExport>;
}

/// Rule-based transformer for the billing system's payment document layout.
#[derive(Debug, Clone)]
pub struct DocumentTransformer {
    classifier: ServiceClassifier,
    payments_cutoff_day: u32,
    reconcile_totals: bool,
}

impl DocumentTransformer {
    /// Create a transformer with default settings.
    pub fn new() -> Self {
        Self::from_config(&GispdConfig::default())
    }

    pub fn from_config(config: &GispdConfig) -> Self {
        Self {
            classifier: ServiceClassifier::new()
                .with_mappings(config.extraction.extra_services.iter().cloned()),
            payments_cutoff_day: config.output.payments_cutoff_day,
            reconcile_totals: config.extraction.reconcile_totals,
        }
    }

    pub fn with_classifier(mut self, classifier: ServiceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_payments_cutoff_day(mut self, day: u32) -> Self {
        self.payments_cutoff_day = day;
        self
    }

    pub fn with_reconciliation(mut self, enabled: bool) -> Self {
        self.reconcile_totals = enabled;
        self
    }

    fn extract_header(&self, doc: &mut SheetContext, references: &ReferenceData) -> Result<DocumentHeader> {
        let period_text = locate_with_fallback(doc.sheet, &fields::PERIOD)?.value;
        let period = parse_period(&period_text)?;
        let account = locate_with_fallback(doc.sheet, &fields::ACCOUNT)?.value;
        let document_number = period.document_number(&account);
        debug!("Period {}, account {}, document {}", period.display(), account, document_number);

        let room_field = locate_with_fallback(doc.sheet, &fields::ROOM)?;
        let room_number: u32 = LEADING_NUMBER
            .captures(&room_field.value)
            .and_then(|caps| caps[1].parse().ok())
            .ok_or_else(|| ExtractionError::Parse {
                field: "room".to_string(),
                value: room_field.source.clone(),
            })?;
        let room = RoomKey::residential(room_number);

        let area_field = locate_with_fallback(doc.sheet, &fields::AREA)?;
        let area = parse_amount(&area_field.value).ok_or_else(|| ExtractionError::Parse {
            field: "area".to_string(),
            value: area_field.source.clone(),
        })?;

        let bank_account = locate_with_fallback(doc.sheet, &fields::BANK_ACCOUNT)?.value;
        let bik = locate_with_fallback(doc.sheet, &fields::BIK)?.value;

        let unique_id = references.unique_id(&room).map(str::to_string);
        let gis_account = unique_id
            .as_deref()
            .and_then(|id| references.account(id))
            .map(str::to_string);
        match (&unique_id, &gis_account) {
            (None, _) => doc.warn(format!("room {} not found in rooms reference", room.number)),
            (Some(id), None) => doc.warn(format!("identifier {} not found in accounts reference", id)),
            _ => {}
        }

        let kr_row = doc.label_row(LABEL_CAPITAL_REPAIR)?;
        let recalculation = if doc.sheet.cell(kr_row, columns::RECALCULATION).trim().is_empty() {
            None
        } else {
            Some(doc.amount(kr_row, columns::RECALCULATION, "capital repair recalculation"))
        };
        let capital_repair = CapitalRepair {
            rate: doc.amount(kr_row, columns::TARIFF, "capital repair rate"),
            charged: doc.amount(kr_row, columns::CHARGED, "capital repair charged"),
            recalculation,
            total: doc.amount(kr_row, columns::CAPITAL_REPAIR_TOTAL, "capital repair total"),
        };

        let total_row = doc.label_row(LABEL_TOTAL)?;
        let total = doc.amount(total_row, columns::AMOUNT_DUE, "document total");

        Ok(DocumentHeader {
            period,
            account,
            document_number,
            room,
            area,
            bank_account,
            bik,
            unique_id,
            gis_account,
            capital_repair,
            total,
        })
    }

    fn extract_services(
        &self,
        doc: &mut SheetContext,
        header: &DocumentHeader,
    ) -> Result<(Vec<ServiceRow>, Vec<PenaltyRow>)> {
        let first = doc.label_row(LABEL_SERVICES)?;
        let last = doc.index.require(LABEL_TOTAL)?;
        if last <= first {
            doc.warn(format!(
                "'{}' row {} is not below '{}' row {}",
                LABEL_TOTAL,
                last + 1,
                LABEL_SERVICES,
                first + 1
            ));
        }

        let mut services = Vec::new();
        let mut penalties = Vec::new();
        let mut common_tariff = Decimal::ZERO;
        let mut common_total = Decimal::ZERO;

        for row in (first + 1)..last {
            let label = doc.index.label(row).unwrap_or_default().to_string();
            if label.is_empty() {
                continue;
            }
            let name = simple_name(&label);

            if name == SERVICE_PENALTY {
                penalties.push(PenaltyRow {
                    document_number: header.document_number.clone(),
                    amount: doc.amount(row, columns::AMOUNT_DUE, "penalty"),
                });
                continue;
            }

            if name == SERVICE_MAINTENANCE {
                common_tariff += doc.amount(row, columns::TARIFF, "maintenance tariff");
                common_total += doc.amount(row, columns::AMOUNT_DUE, "maintenance amount due");
                continue;
            }

            let class = self
                .classifier
                .classify(&label)
                .ok_or_else(|| ExtractionError::UnknownService {
                    room: header.room.number,
                    service: label.clone(),
                })?;

            let tariff = doc.amount(row, columns::TARIFF, &format!("{} tariff", name));
            let charged = doc.amount(row, columns::CHARGED, &format!("{} charged", name));
            let detail = ServiceDetail::Charge {
                individual: class.individual,
                additional: class.additional,
                volume: doc.amount(row, columns::VOLUME, &format!("{} volume", name)),
                tariff,
                charged,
                recalculation: doc.amount(row, columns::RECALCULATION, &format!("{} recalculation", name)),
                amount_due: doc.amount(row, columns::AMOUNT_DUE, &format!("{} amount due", name)),
            };

            if !class.individual {
                common_tariff += tariff;
                common_total += charged;
            }

            debug!("Service '{}' -> '{}'", label, class.canonical_name);
            services.push(ServiceRow {
                document_number: header.document_number.clone(),
                service: class.canonical_name,
                detail,
            });
        }

        services.push(ServiceRow {
            document_number: header.document_number.clone(),
            service: MAINTENANCE_SERVICE.to_string(),
            detail: ServiceDetail::Maintenance {
                tariff: common_tariff,
                total: common_total,
            },
        });

        Ok((services, penalties))
    }
}

impl Default for DocumentTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for DocumentTransformer {
    fn transform(&self, sheet: &Sheet, references: &ReferenceData) -> Result<DocumentExport> {
        let start = Instant::now();
        let mut doc = SheetContext::new(sheet);

        let header = self.extract_header(&mut doc, references)?;
        let (services, penalties) = self.extract_services(&mut doc, &header)?;
        let room = RoomRow::from_header(&header, self.payments_cutoff_day);

        let mut export = DocumentExport {
            header,
            room,
            services,
            penalties,
            warnings: doc.warnings,
        };

        if self.reconcile_totals {
            if let Some(message) = reconcile(&export) {
                warn!("{}: {}", export.document_number(), message);
                export.warnings.push(message);
            }
        }

        info!(
            "Transformed document {} ({} services, {} penalties) in {}ms",
            export.document_number(),
            export.services.len(),
            export.penalties.len(),
            start.elapsed().as_millis()
        );

        Ok(export)
    }
}

/// Compare emitted amounts with the document total.
fn reconcile(export: &DocumentExport) -> Option<String> {
    let mut emitted: Decimal = export.penalties.iter().map(|p| p.amount).sum();
    for service in &export.services {
        match &service.detail {
            ServiceDetail::Charge {
                individual: true,
                amount_due,
                ..
            } => emitted += *amount_due,
            ServiceDetail::Maintenance { total, .. } => emitted += *total,
            ServiceDetail::Charge { .. } => {}
        }
    }

    let total = export.header.total;
    let difference = (emitted - total).abs();
    if difference > Decimal::new(1, 2) {
        Some(format!(
            "document total {} differs from emitted rows {} by {}",
            fixed2(total),
            fixed2(emitted),
            fixed2(difference)
        ))
    } else {
        None
    }
}

/// Sheet with its label index and the warnings collected so far.
struct SheetContext<'a> {
    sheet: &'a Sheet,
    index: RowLabelIndex,
    warnings: Vec<String>,
}

impl<'a> SheetContext<'a> {
    fn new(sheet: &'a Sheet) -> Self {
        Self {
            sheet,
            index: RowLabelIndex::build(sheet),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// First row carrying `label`; repeated labels are reported.
    fn label_row(&mut self, label: &str) -> Result<usize> {
        let rows = self.index.occurrences(label);
        let first = *rows
            .first()
            .ok_or_else(|| ExtractionError::LabelNotFound(label.to_string()))?;
        if rows.len() > 1 {
            self.warn(format!(
                "label '{}' appears {} times, using row {}",
                label,
                rows.len(),
                first + 1
            ));
        }
        Ok(first)
    }

    /// Numeric cell; blank reads as zero, unparsable text as zero with a warning.
    fn amount(&mut self, row: usize, col: usize, field: &str) -> Decimal {
        let text = self.sheet.cell(row, col);
        match read_amount(text) {
            AmountCell::Invalid => {
                let message = format!(
                    "unparsable {} '{}' at row {}, column {}, using 0",
                    field,
                    text,
                    row + 1,
                    col + 1
                );
                self.warn(message);
                Decimal::ZERO
            }
            cell => cell.or_zero(),
        }
    }
}
