//! Runtime configuration
//!
//! Defaults match the "Sample Fabrics" sheet and the page behaviour the
//! gallery has always had. The CLI overrides individual fields.

use std::time::Duration;

/// Google Sheets gviz export for the "Sample Fabrics" tab
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1OaLsjBSqyZyGsqN-qnCh-JB4E0QfUlAX_5Rgam5pIkY/gviz/tq?tqx=out:json&sheet=Sample Fabrics";

/// `/*O_o*/\ngoogle.visualization.Query.setResponse(`
pub const GVIZ_PREFIX_LEN: usize = 47;

/// `);`
pub const GVIZ_SUFFIX_LEN: usize = 2;

/// 1x1 gray PNG used until an image loads, and after it fails
pub const PLACEHOLDER_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub sheet_url: String,
    pub prefix_len: usize,
    pub suffix_len: usize,
    /// Settling delay for free text and the roll width threshold
    pub debounce: Duration,
    /// How far below the viewport an image starts loading
    pub lazy_margin_px: f64,
    /// Scroll distance that re-hides a floating filter bar
    pub buffer_zone_px: f64,
    pub magnifier: MagnifierConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierConfig {
    pub zoom: f64,
    pub min_lens_px: f64,
    pub max_lens_px: f64,
    /// Lens size as a fraction of the shorter image side, before clamping
    pub lens_ratio: f64,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            zoom: 2.5,
            min_lens_px: 80.0,
            max_lens_px: 200.0,
            lens_ratio: 0.3,
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            prefix_len: GVIZ_PREFIX_LEN,
            suffix_len: GVIZ_SUFFIX_LEN,
            debounce: Duration::from_millis(300),
            lazy_margin_px: 200.0,
            buffer_zone_px: 200.0,
            magnifier: MagnifierConfig::default(),
        }
    }
}

impl GalleryConfig {
    pub fn with_sheet_url(mut self, url: impl Into<String>) -> Self {
        self.sheet_url = url.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce.as_millis() as u64
    }
}
