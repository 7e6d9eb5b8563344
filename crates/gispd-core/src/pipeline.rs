//! Per-document export pipeline.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::document::{DocumentParser, DocumentTransformer};
use crate::error::Result;
use crate::lookup::ReferenceData;
use crate::models::config::GispdConfig;
use crate::models::rows::DocumentExport;
use crate::output::OutputSink;
use crate::sheet::open_document;

/// What happened to one payment document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Rows were appended and saved.
    Exported {
        document_number: String,
        services: usize,
        penalties: usize,
        warnings: Vec<String>,
    },
    /// The destination already holds this document.
    Skipped { document_number: String },
}

impl DocumentOutcome {
    pub fn document_number(&self) -> &str {
        match self {
            DocumentOutcome::Exported { document_number, .. }
            | DocumentOutcome::Skipped { document_number } => document_number,
        }
    }
}

/// Reads payment documents, transforms them and commits them to a sink.
pub struct Pipeline {
    config: GispdConfig,
    references: ReferenceData,
    transformer: DocumentTransformer,
}

impl Pipeline {
    pub fn new(config: GispdConfig, references: ReferenceData) -> Self {
        let transformer = DocumentTransformer::from_config(&config);
        Self {
            config,
            references,
            transformer,
        }
    }

    /// Create a pipeline, loading the reference workbooks named in `config`.
    pub fn from_config(config: GispdConfig) -> Self {
        let references = ReferenceData::load(&config);
        Self::new(config, references)
    }

    pub fn config(&self) -> &GispdConfig {
        &self.config
    }

    pub fn references(&self) -> &ReferenceData {
        &self.references
    }

    /// Read and transform one document without writing anything.
    pub fn transform_file(&self, path: &Path) -> Result<DocumentExport> {
        let sheet = open_document(path)?;
        Ok(self.transformer.transform(&sheet, &self.references)?)
    }

    /// Transform one document and commit it to `sink`.
    ///
    /// Nothing reaches the sink unless the whole document transformed.
    pub fn process_file<S: OutputSink + ?Sized>(&self, path: &Path, sink: &mut S) -> Result<DocumentOutcome> {
        info!("Processing {}", path.display());
        let export = self.transform_file(path)?;
        self.commit(&export, sink)
    }

    /// Append a transformed document and save the sink.
    pub fn commit<S: OutputSink + ?Sized>(&self, export: &DocumentExport, sink: &mut S) -> Result<DocumentOutcome> {
        let document_number = export.document_number().to_string();

        if self.config.output.skip_existing && sink.contains(&document_number) {
            warn!("Document {} already exported, skipping", document_number);
            return Ok(DocumentOutcome::Skipped { document_number });
        }

        sink.append(export)?;
        sink.save()?;

        Ok(DocumentOutcome::Exported {
            document_number,
            services: export.services.len(),
            penalties: export.penalties.len(),
            warnings: export.warnings.clone(),
        })
    }
}
