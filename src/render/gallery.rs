//! Card grid rendering
//!
//! Each valid-image record becomes a card: image, name label, an optional
//! low-stock marker, and a `data-index` the page uses to open the detail
//! view. Cards keep the order they are given.
//!
//! Images either load eagerly (`src` is the real URL) or lazily (`src` is the
//! placeholder, the real URL waits in `data-src` for the page's observer).
//! On the first render, a [`GalleryLayout`] estimates where each card lands
//! and cards near the initial viewport load eagerly anyway.

use crate::config::PLACEHOLDER_IMAGE;
use crate::lazy::{ProximityObserver, Span, Viewport};
use crate::record::Record;
use crate::render::escape_html;

pub const NO_RESULTS: &str = "No matching fabrics found.";

/// Estimated grid geometry used for the first render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryLayout {
    pub columns: usize,
    pub card_height: f64,
    pub gap: f64,
    pub viewport_height: f64,
    pub margin: f64,
}

impl Default for GalleryLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            card_height: 320.0,
            gap: 16.0,
            viewport_height: 900.0,
            margin: 200.0,
        }
    }
}

impl GalleryLayout {
    /// Vertical extent of the card at `position` in the grid
    pub fn span(&self, position: usize) -> Span {
        let row = position / self.columns.max(1);
        let top = row as f64 * (self.card_height + self.gap);
        Span {
            top,
            bottom: top + self.card_height,
        }
    }

    /// Grid positions that should load immediately
    pub fn initially_near(&self, count: usize) -> Vec<usize> {
        let mut observer = ProximityObserver::new(self.margin);
        for position in 0..count {
            observer.observe(position, self.span(position));
        }
        observer.poll(Viewport {
            top: 0.0,
            height: self.viewport_height,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadMode {
    Lazy(GalleryLayout),
    Eager,
}

/// Grid contents for the given records (index into the catalog, record)
pub fn render(items: &[(usize, &Record)], mode: &LoadMode) -> String {
    if items.is_empty() {
        return format!("<p class=\"no-results\">{}</p>", NO_RESULTS);
    }

    let eager: Vec<bool> = match mode {
        LoadMode::Eager => vec![true; items.len()],
        LoadMode::Lazy(layout) => {
            let mut flags = vec![false; items.len()];
            for position in layout.initially_near(items.len()) {
                flags[position] = true;
            }
            flags
        }
    };

    let mut html = String::new();
    for ((index, record), eager) in items.iter().zip(eager) {
        if let Some(card) = card(*index, record, eager) {
            html.push_str(&card);
        }
    }
    html
}

/// One card; `None` when the record has no usable image
pub fn card(index: usize, record: &Record, eager: bool) -> Option<String> {
    let url = escape_html(record.image_url()?);
    let name = escape_html(record.display_name());

    let class = if record.is_low_stock() {
        "fabric-card low-stock"
    } else {
        "fabric-card"
    };

    let img = if eager {
        format!(r#"<img src="{url}" data-src="{url}" alt="{name}">"#)
    } else {
        format!(
            r#"<img src="{placeholder}" data-src="{url}" alt="{name}" class="placeholder">"#,
            placeholder = PLACEHOLDER_IMAGE,
        )
    };

    let badge = if record.is_low_stock() {
        r#"<span class="stock-badge">Low Stock</span>"#
    } else {
        ""
    };

    Some(format!(
        r#"<div class="{class}" data-index="{index}" data-sku="{sku}">{img}<p><strong>{name}</strong></p>{badge}</div>"#,
        sku = escape_html(&record.sku),
    ))
}
