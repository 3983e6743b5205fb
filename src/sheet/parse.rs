//! gviz payload decoding
//!
//! The wrapper is stripped by length, not by searching for the callback
//! name: exactly `prefix_len` bytes from the front and `suffix_len` from the
//! back. Whatever is left must be a JSON object with `table.cols` and
//! `table.rows`.

use crate::error::{GalleryError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct Envelope {
    table: SheetTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetTable {
    pub cols: Vec<Column>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Row {
    /// Cells by column index; `null` where the sheet cell is blank
    #[serde(default)]
    pub c: Vec<Option<Cell>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub v: Value,
    /// Sheet-formatted rendering, when the export provides one
    #[serde(default)]
    pub f: Option<String>,
}

/// Strip the export wrapper and decode the table
pub fn parse(text: &str, prefix_len: usize, suffix_len: usize) -> Result<SheetTable> {
    let end = text
        .len()
        .checked_sub(suffix_len)
        .filter(|&end| end >= prefix_len)
        .ok_or_else(|| GalleryError::Parse(format!("response too short ({} bytes)", text.len())))?;

    let body = text.get(prefix_len..end).ok_or_else(|| {
        GalleryError::Parse("wrapper length does not fall on a character boundary".to_string())
    })?;

    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| GalleryError::Parse(format!("payload is not a sheet table: {}", e)))?;

    Ok(envelope.table)
}

/// Column label → index. A repeated label keeps its last position.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    by_label: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_columns(cols: &[Column]) -> Self {
        let mut by_label = HashMap::with_capacity(cols.len());
        for (index, col) in cols.iter().enumerate() {
            by_label.insert(col.label.clone(), index);
        }
        Self { by_label }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

impl Row {
    /// Text of the cell at `index`, or "" when the column or cell is absent
    pub fn text(&self, index: Option<usize>) -> String {
        index
            .and_then(|i| self.c.get(i))
            .and_then(|cell| cell.as_ref())
            .map(|cell| value_text(&cell.v))
            .unwrap_or_default()
    }
}

/// Coerce a cell value to text. Only an absent value becomes ""; a numeric
/// zero stays "0" so it is not mistaken for a blank cell.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    // -0.0 prints as "-0" otherwise
                    Some(f) if f == 0.0 => "0".to_string(),
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
                    Some(f) => f.to_string(),
                    None => String::new(),
                }
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
