//! Detail view for a single record

use crate::record::{Field, Record};
use crate::render::escape_html;

/// Fields shown under the title, in display order
pub const DETAIL_FIELDS: [Field; 9] = [
    Field::Sku,
    Field::Type,
    Field::Family,
    Field::Colour,
    Field::BandWidth,
    Field::RollWidth,
    Field::Schedule,
    Field::Status,
    Field::OrderingStatus,
];

pub const NOT_AVAILABLE: &str = "N/A";

/// Label and display value for every detail field
pub fn fields(record: &Record) -> Vec<(&'static str, String)> {
    DETAIL_FIELDS
        .iter()
        .map(|&field| {
            let value = record.text(field);
            let value = if value.is_empty() { NOT_AVAILABLE } else { value };
            (field.label(), value.to_string())
        })
        .collect()
}

/// Where a click inside an open detail view landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    CloseControl,
    Backdrop,
    Content,
}

impl ModalClick {
    pub fn dismisses(self) -> bool {
        matches!(self, ModalClick::CloseControl | ModalClick::Backdrop)
    }
}

/// Modal markup. The image loads straight away; the page swaps in the
/// placeholder if it fails.
pub fn render(index: usize, record: &Record) -> String {
    let name = escape_html(record.display_name());
    let url = record.image_url().map(escape_html).unwrap_or_default();

    let mut rows = String::new();
    for (label, value) in fields(record) {
        rows.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>",
            label,
            escape_html(&value)
        ));
    }

    format!(
        r#"<div class="modal" data-index="{index}"><div class="modal-content"><span class="close" role="button" aria-label="Close">×</span><div class="magnifier-host"><img class="detail-image" src="{url}" data-src="{url}" alt="{name}"><div class="magnifier-lens" hidden></div></div><h2>{name}</h2>{rows}</div></div>"#
    )
}
