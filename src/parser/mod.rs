//! Spreadsheet (CSV export) parsing with encoding and delimiter auto-detection.
//!
//! Two layers:
//!
//! 1. Generic parsing of the sheet into headers + string cells
//!    ([`parse_sheet_file`], [`parse_sheet_bytes`]), with encoding detected
//!    via chardet and the delimiter guessed from the header line.
//! 2. Typed extraction of [`TradeRow`]s ([`trade_rows`]), which enforces the
//!    fixed twelve-column input schema. A missing column is a hard failure;
//!    blank optional cells become `None`.

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::models::TradeRow;

/// The twelve required sheet columns.
pub mod columns {
    pub const ITEM_ID: &str = "Item_ID";
    pub const PROFESSION: &str = "Profession";
    pub const TRADE_LEVEL: &str = "Trade Level";
    pub const BUY_PRICE: &str = "Buy Price";
    pub const BUY_AMOUNT: &str = "Buy Amount";
    pub const TRADE_TYPE: &str = "Trade Type";
    pub const SELL_PRICE: &str = "Sell Price";
    pub const SELL_AMOUNT: &str = "Sell Amount";
    pub const CONVERT_ITEM_ID: &str = "Convert Item ID";
    pub const CONVERT_ITEM_AMOUNT: &str = "Convert Item Amount";
    pub const MAX_USES: &str = "Max";
    pub const XP: &str = "XP";

    /// All required columns, in sheet order.
    pub const REQUIRED: [&str; 12] = [
        ITEM_ID,
        PROFESSION,
        TRADE_LEVEL,
        BUY_PRICE,
        BUY_AMOUNT,
        TRADE_TYPE,
        SELL_PRICE,
        SELL_AMOUNT,
        CONVERT_ITEM_ID,
        CONVERT_ITEM_AMOUNT,
        MAX_USES,
        XP,
    ];
}

/// Parsed sheet with metadata.
#[derive(Debug, Clone)]
pub struct SheetData {
    /// Column headers from the first line.
    pub headers: Vec<String>,
    /// Data rows as raw string cells.
    pub rows: Vec<Vec<String>>,
    /// Detected or used encoding.
    pub encoding: String,
    /// Detected or used delimiter.
    pub delimiter: char,
}

impl SheetData {
    /// Rows as JSON objects keyed by header, for debug output.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (i, header) in self.headers.iter().enumerate() {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    obj.insert(header.clone(), json!(cell));
                }
                Value::Object(obj)
            })
            .collect()
    }
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        // UTF-8 and anything unknown: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ';';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse a sheet file with auto-detection of encoding and delimiter.
pub fn parse_sheet_file<P: AsRef<Path>>(path: P) -> SheetResult<SheetData> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_sheet_bytes(&bytes)
}

/// Parse sheet bytes with auto-detection of encoding and delimiter.
pub fn parse_sheet_bytes(bytes: &[u8]) -> SheetResult<SheetData> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    parse_content(&content, delimiter, encoding)
}

/// Parse sheet text with an explicit delimiter.
pub fn parse_content(content: &str, delimiter: char, encoding: String) -> SheetResult<SheetData> {
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(SheetError::EmptyFile)?;

    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::NoHeaders);
    }

    let mut rows = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        rows.push(
            line.split(delimiter)
                .map(|s| s.trim().trim_matches('"').to_string())
                .collect(),
        );
    }

    Ok(SheetData {
        headers,
        rows,
        encoding,
        delimiter,
    })
}

/// Extract typed [`TradeRow`]s from a parsed sheet.
///
/// Fails with [`SheetError::MissingColumn`] if any of the twelve required
/// columns is absent, or [`SheetError::InvalidCell`] when an optional numeric
/// cell is non-blank but not an integer.
pub fn trade_rows(sheet: &SheetData) -> SheetResult<Vec<TradeRow>> {
    let index = ColumnIndex::resolve(&sheet.headers)?;

    let mut out = Vec::with_capacity(sheet.rows.len());

    for (i, row) in sheet.rows.iter().enumerate() {
        // +1 for 0-index, +1 for the header line
        let line = i + 2;

        out.push(TradeRow {
            item_id: index.cell(row, columns::ITEM_ID),
            profession: index.cell(row, columns::PROFESSION),
            trade_level: index.cell(row, columns::TRADE_LEVEL),
            buy_price: index.cell(row, columns::BUY_PRICE),
            buy_amount: index.cell(row, columns::BUY_AMOUNT),
            trade_type: index.cell(row, columns::TRADE_TYPE),
            sell_price: index.cell(row, columns::SELL_PRICE),
            sell_amount: index.cell(row, columns::SELL_AMOUNT),
            convert_item_id: index.optional_cell(row, columns::CONVERT_ITEM_ID),
            convert_item_amount: index.optional_u32(row, columns::CONVERT_ITEM_AMOUNT, line)?,
            max_uses: index.optional_u32(row, columns::MAX_USES, line)?,
            xp: index.optional_u32(row, columns::XP, line)?,
        });
    }

    Ok(out)
}

/// Header name → column position lookup.
struct ColumnIndex {
    headers: Vec<String>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> SheetResult<Self> {
        for required in columns::REQUIRED {
            if !headers.iter().any(|h| h == required) {
                return Err(SheetError::MissingColumn(required.to_string()));
            }
        }
        Ok(Self {
            headers: headers.to_vec(),
        })
    }

    fn position(&self, column: &str) -> usize {
        // Presence was checked in resolve()
        self.headers.iter().position(|h| h == column).unwrap_or(0)
    }

    fn cell(&self, row: &[String], column: &str) -> String {
        row.get(self.position(column))
            .cloned()
            .unwrap_or_default()
    }

    fn optional_cell(&self, row: &[String], column: &str) -> Option<String> {
        let cell = self.cell(row, column);
        if cell.is_empty() {
            None
        } else {
            Some(cell)
        }
    }

    fn optional_u32(&self, row: &[String], column: &str, line: usize) -> SheetResult<Option<u32>> {
        match self.optional_cell(row, column) {
            None => Ok(None),
            Some(cell) => cell.trim().parse::<u32>().map(Some).map_err(|_| {
                SheetError::invalid_cell(line, column, cell, "expected a non-negative integer")
            }),
        }
    }
}
