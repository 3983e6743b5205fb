//! Record normalization
//!
//! Every sheet row becomes one [`Record`] with a fixed set of typed fields.
//! The sheet's column order is irrelevant: each field is looked up by its
//! header label, and anything absent becomes an empty string (never zero, so
//! "missing" stays distinguishable from "0").
//!
//! # Derived fields
//!
//! - **Band width**: the leading number of the cell text. `"3 Thick"` gives
//!   `3.0`; `"Thick"` gives nothing. The trailing text is dropped on purpose.
//! - **Image**: the link qualified with `https://` when it has no scheme, kept
//!   only if it parses as an absolute URL with a host. The normalized link
//!   and "has a valid image" are the same `Option`, so they cannot disagree.
//!
//! A bad image link only affects its own record: it is logged and the record
//! is kept without an image.

use crate::sheet::{ColumnIndex, Row, SheetTable};
use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Columns the gallery reads, by sheet header label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Sku,
    Type,
    Name,
    Family,
    Colour,
    BandWidth,
    RollWidth,
    Schedule,
    Status,
    ImageLink,
    OrderingStatus,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Sku,
        Field::Type,
        Field::Name,
        Field::Family,
        Field::Colour,
        Field::BandWidth,
        Field::RollWidth,
        Field::Schedule,
        Field::Status,
        Field::ImageLink,
        Field::OrderingStatus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Sku => "SKU",
            Field::Type => "Type",
            Field::Name => "Name",
            Field::Family => "Family",
            Field::Colour => "Colour",
            Field::BandWidth => "Band Width",
            Field::RollWidth => "Roll Width",
            Field::Schedule => "Schedule",
            Field::Status => "Status",
            Field::ImageLink => "Image Link",
            Field::OrderingStatus => "Ordering Status",
        }
    }
}

/// Ordering status that earns the low-stock marker
pub const LOW_STOCK: &str = "Low Stock";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub sku: String,
    pub kind: String,
    pub name: String,
    pub family: String,
    pub colour: String,
    /// Band width as written in the sheet
    pub band_width_text: String,
    /// Leading number of `band_width_text`
    pub band_width: Option<f64>,
    pub roll_width: String,
    pub schedule: String,
    pub status: String,
    pub ordering_status: String,
    /// Image link as written in the sheet
    pub image_link: String,
    /// Normalized link; `None` when the raw link is missing or malformed
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageLinkError {
    #[error("no image link provided")]
    Missing,
    #[error("invalid image URL {link:?}: {reason}")]
    Malformed { link: String, reason: String },
}

impl Record {
    /// Build a record from one sheet row
    pub fn from_row(row: &Row, columns: &ColumnIndex) -> Self {
        let text = |field: Field| row.text(columns.get(field.label()));

        let band_width_text = text(Field::BandWidth);
        let image_link = text(Field::ImageLink);

        let mut record = Record {
            sku: text(Field::Sku),
            kind: text(Field::Type),
            name: text(Field::Name),
            family: text(Field::Family),
            colour: text(Field::Colour),
            band_width: parse_band_width(&band_width_text),
            band_width_text,
            roll_width: text(Field::RollWidth),
            schedule: text(Field::Schedule),
            status: text(Field::Status),
            ordering_status: text(Field::OrderingStatus),
            image_link,
            image: None,
        };

        match validate_image_link(&record.image_link) {
            Ok(url) => record.image = Some(url),
            Err(e) => warn!(fabric = %record.name, "{}", e),
        }

        record
    }

    pub fn has_valid_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Numeric roll width, 0 when the text is not a plain number
    pub fn roll_width_value(&self) -> f64 {
        parse_roll_width(&self.roll_width)
    }

    pub fn is_low_stock(&self) -> bool {
        self.ordering_status == LOW_STOCK
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed Fabric"
        } else {
            &self.name
        }
    }

    /// Text of a field as shown to the user
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Sku => &self.sku,
            Field::Type => &self.kind,
            Field::Name => &self.name,
            Field::Family => &self.family,
            Field::Colour => &self.colour,
            Field::BandWidth => &self.band_width_text,
            Field::RollWidth => &self.roll_width,
            Field::Schedule => &self.schedule,
            Field::Status => &self.status,
            Field::ImageLink => &self.image_link,
            Field::OrderingStatus => &self.ordering_status,
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Record", 14)?;
        s.serialize_field("sku", &self.sku)?;
        s.serialize_field("type", &self.kind)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("family", &self.family)?;
        s.serialize_field("colour", &self.colour)?;
        s.serialize_field("band_width", &self.band_width)?;
        s.serialize_field("band_width_text", &self.band_width_text)?;
        s.serialize_field("roll_width", &self.roll_width)?;
        s.serialize_field("schedule", &self.schedule)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("ordering_status", &self.ordering_status)?;
        s.serialize_field("image_link", &self.image_link)?;
        s.serialize_field("image_link_normalized", &self.image)?;
        s.serialize_field("has_valid_image", &self.has_valid_image())?;
        s.end()
    }
}

/// Normalize every row of a decoded table, in sheet order
pub fn normalize(table: &SheetTable) -> Vec<Record> {
    let columns = ColumnIndex::from_columns(&table.cols);
    table.rows.iter().map(|row| Record::from_row(row, &columns)).collect()
}

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(?:\.\d+)?").expect("static regex"))
}

/// Leading `digits[.digits]` of the text, if any
pub fn parse_band_width(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    leading_number()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Whole-text numeric parse; anything else (including unit suffixes) is 0
pub fn parse_roll_width(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Qualify and validate an image link
pub fn validate_image_link(raw: &str) -> Result<String, ImageLinkError> {
    let link = raw.trim();
    if link.is_empty() {
        return Err(ImageLinkError::Missing);
    }

    let candidate = if link.contains("://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    };

    let parsed = Url::parse(&candidate).map_err(|e| ImageLinkError::Malformed {
        link: link.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(candidate),
        _ => Err(ImageLinkError::Malformed {
            link: link.to_string(),
            reason: "no host".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse;
    use crate::test_support::{sheet_text, RowSpec};

    fn normalize_rows(rows: &[RowSpec]) -> Vec<Record> {
        let text = sheet_text(rows);
        let table = parse::parse(&text, 47, 2).unwrap();
        normalize(&table)
    }

    // ==========================================================================
    // BAND WIDTH
    // ==========================================================================
    //
    // Band widths are typed freely in the sheet ("3", "3 Thick", "2.5mm").
    // Only the leading number is kept.
    // ==========================================================================

    #[test]
    fn test_band_width_leading_number() {
        assert_eq!(parse_band_width("3 Thick"), Some(3.0));
        assert_eq!(parse_band_width("2.5mm"), Some(2.5));
        assert_eq!(parse_band_width("12"), Some(12.0));
    }

    #[test]
    fn test_band_width_without_leading_digit() {
        assert_eq!(parse_band_width("Thick 3"), None);
        assert_eq!(parse_band_width(" 3"), None);
        assert_eq!(parse_band_width(""), None);
    }

    #[test]
    fn test_band_width_trailing_dot_ignored() {
        assert_eq!(parse_band_width("4. wide"), Some(4.0));
    }

    // ==========================================================================
    // ROLL WIDTH
    // ==========================================================================

    #[test]
    fn test_roll_width_plain_numbers() {
        assert_eq!(parse_roll_width("54"), 54.0);
        assert_eq!(parse_roll_width(" 60.5 "), 60.5);
    }

    #[test]
    fn test_roll_width_unit_suffix_is_zero() {
        assert_eq!(parse_roll_width("45in"), 0.0);
        assert_eq!(parse_roll_width(""), 0.0);
        assert_eq!(parse_roll_width("inf"), 0.0);
    }

    // ==========================================================================
    // IMAGE LINKS
    // ==========================================================================

    #[test]
    fn test_image_link_bare_domain_is_qualified() {
        assert_eq!(
            validate_image_link("example.com/a.png").unwrap(),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_image_link_with_scheme_kept() {
        assert_eq!(
            validate_image_link("http://cdn.example.com/x.jpg").unwrap(),
            "http://cdn.example.com/x.jpg"
        );
    }

    #[test]
    fn test_image_link_trimmed() {
        assert_eq!(
            validate_image_link("  example.com/a.png\n").unwrap(),
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_image_link_missing() {
        assert_eq!(validate_image_link(""), Err(ImageLinkError::Missing));
        assert_eq!(validate_image_link("   "), Err(ImageLinkError::Missing));
    }

    #[test]
    fn test_image_link_malformed() {
        assert!(matches!(
            validate_image_link("not a url"),
            Err(ImageLinkError::Malformed { .. })
        ));
        assert!(matches!(
            validate_image_link("https://"),
            Err(ImageLinkError::Malformed { .. })
        ));
    }

    // ==========================================================================
    // ROW NORMALIZATION
    // ==========================================================================

    #[test]
    fn test_normalize_linen_grey_example() {
        let records = normalize_rows(&[RowSpec::new("F1", "Linen Grey")
            .band_width("3 Thick")
            .image("example.com/a.png")]);

        let r = &records[0];
        assert_eq!(r.sku, "F1");
        assert_eq!(r.name, "Linen Grey");
        assert_eq!(r.band_width, Some(3.0));
        assert_eq!(r.band_width_text, "3 Thick");
        assert_eq!(r.image_url(), Some("https://example.com/a.png"));
        assert!(r.has_valid_image());
    }

    #[test]
    fn test_normalize_empty_image_link() {
        let records = normalize_rows(&[RowSpec::new("F2", "No Picture").image("")]);
        assert!(!records[0].has_valid_image());
        assert_eq!(records[0].image, None);
    }

    #[test]
    fn test_bad_record_does_not_abort_batch() {
        let records = normalize_rows(&[
            RowSpec::new("A", "First").image("example.com/a.png"),
            RowSpec::new("B", "Broken").image("http://bad host/x.png"),
            RowSpec::new("C", "Third").image("example.com/c.png"),
        ]);

        assert_eq!(records.len(), 3);
        assert!(records[0].has_valid_image());
        assert!(!records[1].has_valid_image());
        assert!(records[2].has_valid_image());
    }

    #[test]
    fn test_missing_columns_default_to_empty() {
        let text = crate::test_support::wrap(
            r#"{"table":{"cols":[{"label":"Name"}],"rows":[{"c":[{"v":"Solo"}]}]}}"#,
        );
        let table = parse::parse(&text, 47, 2).unwrap();
        let records = normalize(&table);

        assert_eq!(records[0].name, "Solo");
        assert_eq!(records[0].sku, "");
        assert_eq!(records[0].roll_width, "");
        assert_eq!(records[0].band_width, None);
    }

    #[test]
    fn test_numeric_cells_become_text() {
        let text = crate::test_support::wrap(
            r#"{"table":{"cols":[{"label":"Band Width"},{"label":"Roll Width"}],"rows":[{"c":[{"v":3},{"v":54.0}]}]}}"#,
        );
        let table = parse::parse(&text, 47, 2).unwrap();
        let records = normalize(&table);

        assert_eq!(records[0].band_width, Some(3.0));
        assert_eq!(records[0].roll_width, "54");
        assert_eq!(records[0].roll_width_value(), 54.0);
    }

    #[test]
    fn test_zero_cells_differ_from_blank_cells() {
        let text = crate::test_support::wrap(
            r#"{"table":{"cols":[{"label":"Band Width"},{"label":"Roll Width"}],"rows":[{"c":[{"v":0},{"v":0}]},{"c":[null,null]}]}}"#,
        );
        let table = parse::parse(&text, 47, 2).unwrap();
        let records = normalize(&table);

        assert_eq!(records[0].band_width_text, "0");
        assert_eq!(records[0].band_width, Some(0.0));
        assert_eq!(records[0].roll_width, "0");

        assert_eq!(records[1].band_width_text, "");
        assert_eq!(records[1].band_width, None);
        assert_eq!(records[1].roll_width, "");
    }

    #[test]
    fn test_low_stock_and_display_name() {
        let mut record = Record::default();
        assert_eq!(record.display_name(), "Unnamed Fabric");
        assert!(!record.is_low_stock());

        record.ordering_status = LOW_STOCK.to_string();
        record.name = "Boucle".to_string();
        assert!(record.is_low_stock());
        assert_eq!(record.display_name(), "Boucle");
    }

    #[test]
    fn test_record_serializes_derived_fields() {
        let records = normalize_rows(&[RowSpec::new("F1", "Linen Grey").image("example.com/a.png")]);
        let json = serde_json::to_value(&records[0]).unwrap();

        assert_eq!(json["type"], "Linen");
        assert_eq!(json["image_link_normalized"], "https://example.com/a.png");
        assert_eq!(json["has_valid_image"], true);
    }
}
