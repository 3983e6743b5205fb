//! Exports of the current gallery view
//!
//! - **HTML**: a self-contained gallery page with the filtered cards
//! - **JSON**: summary, filter options and the visible records
//! - **CSV**: the visible records, one row per fabric
//!
//! # Usage
//!
//! ```ignore
//! use fabric_gallery::report;
//!
//! // Picks the format from the extension
//! report::generate("gallery.html", &session, &config)?;
//! report::generate("gallery.json", &session, &config)?;
//! report::generate("gallery.csv", &session, &config)?;
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::record::Record;
use crate::session::Session;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Write an export in the format matching the file extension
pub fn generate<P: AsRef<Path>>(path: P, session: &Session, config: &GalleryConfig) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, session, config),
        "json" => json::write(&mut file, session),
        _ => csv::write(&mut file, session),
    }
}

/// Counts shown at the top of every export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Rows in the sheet
    pub total: usize,
    pub with_image: usize,
    pub without_image: usize,
    /// Cards left after filtering
    pub visible: usize,
    /// Visible cards marked low stock
    pub low_stock: usize,
}

impl Summary {
    pub fn from_session(session: &Session) -> Self {
        Self::new(session.catalog(), &session.visible())
    }

    /// Counts for an arbitrary filtered subset of the catalog
    pub fn new(catalog: &Catalog, visible: &[(usize, &Record)]) -> Self {
        Self {
            total: catalog.len(),
            with_image: catalog.valid_count(),
            without_image: catalog.len() - catalog.valid_count(),
            visible: visible.len(),
            low_stock: visible.iter().filter(|(_, r)| r.is_low_stock()).count(),
        }
    }

    /// Header line, e.g. "3 of 4 fabrics"
    pub fn headline(&self) -> String {
        format!("{} of {} fabrics", self.visible, self.with_image)
    }
}
