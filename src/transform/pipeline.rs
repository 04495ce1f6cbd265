//! High-level pipeline API: sheet → rows → profession documents.
//!
//! Combines parsing (with encoding/delimiter auto-detection), the row
//! transformer, and schema validation of every emitted document.
//!
//! # Example
//!
//! ```rust,ignore
//! use tradegen::{transform_sheet, TransformOptions};
//! use std::path::Path;
//!
//! let options = TransformOptions::new("createengineers");
//! let outcome = transform_sheet(Path::new("trades.csv"), &options)?;
//! println!("{} professions", outcome.documents.len());
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{ProfessionDocument, ProfessionKey};
use crate::parser::{parse_sheet_bytes, parse_sheet_file, trade_rows, SheetData};
use crate::transform::trades::{
    transform_rows, DefaultsSource, SeededDefaults, ThreadRngDefaults,
};
use crate::validation::validate_profession_document;

/// Options for the transformation pipeline.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Namespace prepended to profession names (`prefix:Blacksmith`).
    pub profession_prefix: String,

    /// Namespace used inside each trade's `type` field.
    pub trade_type_prefix: String,

    /// Skip schema validation of the emitted documents.
    pub skip_validation: bool,

    /// Seed for the fallback-value generator; unseeded thread RNG if `None`.
    pub seed: Option<u64>,
}

impl TransformOptions {
    /// Options with the trade-type prefix equal to the profession prefix,
    /// which is the common case.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            trade_type_prefix: prefix.clone(),
            profession_prefix: prefix,
            skip_validation: false,
            seed: None,
        }
    }

    pub fn with_trade_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trade_type_prefix = prefix.into();
        self
    }

    fn defaults_source(&self) -> Box<dyn DefaultsSource> {
        match self.seed {
            Some(seed) => Box::new(SeededDefaults::new(seed)),
            None => Box::new(ThreadRngDefaults),
        }
    }
}

/// Result of a complete pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// One document per profession, in key order.
    pub documents: BTreeMap<ProfessionKey, ProfessionDocument>,

    /// Sheet parsing metadata.
    pub sheet: SheetInfo,

    /// Number of documents that passed schema validation.
    pub valid_count: usize,

    /// Number of documents that failed schema validation.
    pub invalid_count: usize,

    /// Validation errors per failing document (profession key, messages).
    pub validation_errors: Vec<(String, Vec<String>)>,
}

/// Sheet file information.
#[derive(Debug, Clone)]
pub struct SheetInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl SheetInfo {
    fn from_sheet(sheet: &SheetData) -> Self {
        Self {
            encoding: sheet.encoding.clone(),
            delimiter: sheet.delimiter,
            headers: sheet.headers.clone(),
            row_count: sheet.rows.len(),
        }
    }
}

/// Transform a spreadsheet file into profession documents.
///
/// Steps:
/// 1. Parse the sheet with encoding/delimiter auto-detection
/// 2. Extract typed rows (twelve-column schema enforced)
/// 3. Run the row transformer
/// 4. Validate every document against the embedded schema (unless skipped)
pub fn transform_sheet(path: &Path, options: &TransformOptions) -> PipelineResult<PipelineOutcome> {
    let sheet = parse_sheet_file(path)?;
    transform_parsed(sheet, options)
}

/// Same as [`transform_sheet`] but from raw bytes.
pub fn transform_bytes(bytes: &[u8], options: &TransformOptions) -> PipelineResult<PipelineOutcome> {
    let sheet = parse_sheet_bytes(bytes)?;
    transform_parsed(sheet, options)
}

fn transform_parsed(sheet: SheetData, options: &TransformOptions) -> PipelineResult<PipelineOutcome> {
    let rows = trade_rows(&sheet)?;
    if rows.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut defaults = options.defaults_source();
    let documents = transform_rows(
        &rows,
        &options.profession_prefix,
        &options.trade_type_prefix,
        defaults.as_mut(),
    )?;

    let mut valid_count = 0;
    let mut invalid_count = 0;
    let mut validation_errors = Vec::new();

    if options.skip_validation {
        valid_count = documents.len();
    } else {
        for (key, doc) in &documents {
            let value = serde_json::to_value(doc).map_err(crate::error::SinkError::from)?;
            match validate_profession_document(&value) {
                Ok(()) => valid_count += 1,
                Err(errors) => {
                    invalid_count += 1;
                    validation_errors.push((key.to_string(), errors));
                }
            }
        }
    }

    Ok(PipelineOutcome {
        documents,
        sheet: SheetInfo::from_sheet(&sheet),
        valid_count,
        invalid_count,
        validation_errors,
    })
}
