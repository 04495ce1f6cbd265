//! # tradegen - spreadsheet trade definitions → villager trade JSON
//!
//! Tradegen reads tabular trade definitions (CSV exports of the trade
//! spreadsheet) and emits one JSON configuration file per profession for
//! the game's villager-trading system.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Sheet (CSV) │────▶│   Parser    │────▶│  Transformer │────▶│  JSON files  │
//! │ (ISO/UTF8)  │     │ (auto-enc)  │     │ (rows→trades)│     │ (1/profession)│
//! └─────────────┘     └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tradegen::{transform_sheet, write_documents, TransformOptions};
//! use std::path::Path;
//!
//! let options = TransformOptions::new("createengineers");
//! let outcome = transform_sheet(Path::new("trades.csv"), &options)?;
//! write_documents(Path::new("out"), &options.profession_prefix, &outcome.documents)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Tier, Trade, ProfessionDocument)
//! - [`parser`] - Sheet parsing with auto-detection
//! - [`transform`] - Row transformer and pipeline
//! - [`validation`] - Profession-document schema validation
//! - [`sink`] - Per-profession JSON file output

pub mod error;
pub mod models;

pub mod parser;

pub mod transform;

pub mod validation;

pub mod sink;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    PipelineError, SheetError, SinkError, TransformError, ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    BuyTrade, ItemStack, ProcessTrade, ProfessionDocument, ProfessionKey, SellTrade, Tier,
    TierTrades, Trade, TradeRow, TradeType, CURRENCY_ITEM, FALLBACK_CONVERTIBLE,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    detect_delimiter, detect_encoding, parse_sheet_bytes, parse_sheet_file, trade_rows, SheetData,
};

// =============================================================================
// Re-exports - Transformer
// =============================================================================

pub use transform::trades::{
    transform_rows, DefaultsSource, SeededDefaults, ThreadRngDefaults,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    transform_bytes, transform_sheet, PipelineOutcome, SheetInfo, TransformOptions,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    is_valid, is_valid_item_id, is_valid_profession_document, validate,
    validate_profession_document,
};

// =============================================================================
// Re-exports - Sink
// =============================================================================

pub use sink::write_documents;
