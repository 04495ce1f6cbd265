//! File sink: one JSON file per profession document.
//!
//! Files are named after the profession with the prefix stripped
//! (`createengineers:Blacksmith` → `Blacksmith.json`) and serialized with
//! 2-space indentation. Tiers without trades are written as empty arrays.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SinkResult;
use crate::models::{ProfessionDocument, ProfessionKey};

/// Write every document into `dir`, creating it if needed.
///
/// Returns the written paths, in document (key) order.
pub fn write_documents(
    dir: &Path,
    profession_prefix: &str,
    documents: &BTreeMap<ProfessionKey, ProfessionDocument>,
) -> SinkResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(documents.len());

    for (key, doc) in documents {
        let path = dir.join(format!("{}.json", key.file_stem(profession_prefix)));
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&path, json)?;
        written.push(path);
    }

    Ok(written)
}
