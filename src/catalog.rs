//! The normalized record set for one fetch cycle
//!
//! A [`Catalog`] is built once from the export text and never mutated. It
//! keeps every record (including ones without a usable image) and exposes the
//! valid-image subset that the gallery and the filter engine work from.

use crate::error::Result;
use crate::record::{self, Record};
use crate::sheet::{parse, Fetcher};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        let catalog = Self { records };
        info!(
            "Fabrics with valid images: {} out of {}",
            catalog.valid_count(),
            catalog.len()
        );
        catalog
    }

    /// Decode and normalize raw export text
    pub fn from_text(text: &str, prefix_len: usize, suffix_len: usize) -> Result<Self> {
        let table = parse::parse(text, prefix_len, suffix_len)?;
        info!("Parsed rows: {}", table.rows.len());
        Ok(Self::new(record::normalize(&table)))
    }

    /// Fetch, decode and normalize in one go
    pub fn load<F: Fetcher + ?Sized>(
        fetcher: &F,
        url: &str,
        prefix_len: usize,
        suffix_len: usize,
    ) -> Result<Self> {
        let text = fetcher.fetch(url)?;
        Self::from_text(&text, prefix_len, suffix_len)
    }

    /// Every record, in sheet order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Records with a valid image, in sheet order, with their catalog index
    pub fn gallery(&self) -> Vec<(usize, &Record)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_valid_image())
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_valid_image()).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use crate::sheet::FileFetcher;
    use crate::test_support::{catalog, sample_rows, sheet_text};
    use std::io::Write;

    #[test]
    fn test_gallery_excludes_invalid_images() {
        let catalog = catalog(&sample_rows());

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.valid_count(), 4);

        let skus: Vec<&str> = catalog.gallery().iter().map(|(_, r)| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["F1", "F2", "GREY-9", "F5"]);
    }

    #[test]
    fn test_gallery_keeps_catalog_indices() {
        let catalog = catalog(&sample_rows());
        let indices: Vec<usize> = catalog.gallery().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 4]);
        assert_eq!(catalog.get(3).map(|r| r.sku.as_str()), Some("F4"));
    }

    #[test]
    fn test_load_through_fetcher() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", sheet_text(&sample_rows())).unwrap();

        let catalog = Catalog::load(&FileFetcher::new(file.path()), "", 47, 2).unwrap();
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_load_propagates_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not an export").unwrap();

        let err = Catalog::load(&FileFetcher::new(file.path()), "", 47, 2).unwrap_err();
        assert!(matches!(err, GalleryError::Parse(_)));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.gallery().is_empty());
    }
}
