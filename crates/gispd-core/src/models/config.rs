//! Configuration structures for the export pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the gispd pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GispdConfig {
    /// Input, output and reference file locations.
    pub paths: PathsConfig,

    /// Reference workbook layout.
    pub reference: ReferenceConfig,

    /// Payment document extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output workbook configuration.
    pub output: OutputConfig,
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for `.xls` payment documents.
    pub input_dir: PathBuf,

    /// Output workbook all documents are merged into.
    pub output_file: PathBuf,

    /// Reference workbook mapping rooms to unique identifiers.
    pub rooms_file: PathBuf,

    /// Reference workbook mapping unique identifiers to accounts.
    pub accounts_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./In/"),
            output_file: PathBuf::from("PDTemplate.xlsx"),
            rooms_file: PathBuf::from("Rooms.xlsx"),
            accounts_file: PathBuf::from("Accounts.xlsx"),
        }
    }
}

/// Layout of the two reference workbooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Rooms workbook sheets are selected by this name prefix.
    pub rooms_sheet_prefix: String,

    /// Rows of the rooms workbook whose first cell lacks this prefix are ignored.
    pub institution_code_prefix: String,

    /// Exact name of the accounts sheet.
    pub accounts_sheet: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            rooms_sheet_prefix: "Идентификатор".to_string(),
            institution_code_prefix: "630049".to_string(),
            accounts_sheet: "Шаблон экспорта ЕЛС".to_string(),
        }
    }
}

/// Extra entry for the service vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMapping {
    /// Description as printed on the payment document.
    pub raw: String,

    /// Service name in the GIS ZHKH vocabulary.
    pub canonical: String,

    /// Individual consumption (false means common-property consumption).
    pub individual: bool,

    /// Additional (non-utility) service.
    pub additional: bool,
}

/// Payment document extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Compare the emitted totals with the document total and warn on mismatch.
    pub reconcile_totals: bool,

    /// Mappings consulted after the built-in service table.
    pub extra_services: Vec<ServiceMapping>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            reconcile_totals: true,
            extra_services: Vec::new(),
        }
    }
}

/// Output workbook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Skip documents whose number is already present in the output.
    pub skip_existing: bool,

    /// Day of month up to which payments are accounted for.
    pub payments_cutoff_day: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            skip_existing: false,
            payments_cutoff_day: 31,
        }
    }
}

impl GispdConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_fixed_layout() {
        let config = GispdConfig::default();
        assert_eq!(config.paths.input_dir, PathBuf::from("./In/"));
        assert_eq!(config.paths.output_file, PathBuf::from("PDTemplate.xlsx"));
        assert_eq!(config.reference.institution_code_prefix, "630049");
        assert_eq!(config.output.payments_cutoff_day, 31);
        assert!(!config.output.skip_existing);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GispdConfig =
            serde_json::from_str(r#"{"output": {"skip_existing": true}}"#).unwrap();
        assert!(config.output.skip_existing);
        assert_eq!(config.output.payments_cutoff_day, 31);
        assert_eq!(config.reference.accounts_sheet, "Шаблон экспорта ЕЛС");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = GispdConfig::default();
        config.extraction.extra_services.push(ServiceMapping {
            raw: "вывоз мусора".to_string(),
            canonical: "Обращение с ТКО".to_string(),
            individual: true,
            additional: false,
        });
        config.save(&path).unwrap();

        let loaded = GispdConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.extra_services, config.extraction.extra_services);
    }
}
