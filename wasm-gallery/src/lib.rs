//! Browser bindings for the fabric gallery
//!
//! The page fetches the sheet export itself and hands the raw text to
//! [`GallerySession`]. From then on the page only forwards DOM events
//! (input, checkbox, scroll, pointer) and writes back the HTML and
//! positions the session returns. Timestamps come from `performance.now()`.

use fabric_gallery::lazy::{ProximityObserver, Span, Viewport};
use fabric_gallery::render::detail::ModalClick;
use fabric_gallery::render::magnifier::{Magnifier, Point, Size};
use fabric_gallery::toolbar::ScrollMetrics;
use fabric_gallery::{
    BarState, Event, FilterBar, FilterField, GalleryConfig, Millis, Session, LOAD_FAILED_MESSAGE,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Filter bar state plus the offset a floating bar is drawn at
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarView {
    pub state: BarState,
    pub shown_at: f64,
}

impl BarView {
    fn of(bar: &FilterBar) -> Self {
        Self {
            state: bar.state(),
            shown_at: bar.shown_at(),
        }
    }
}

#[wasm_bindgen]
pub struct GallerySession {
    session: Session,
    bar: FilterBar,
    magnifier: Magnifier,
    cards: ProximityObserver<u32>,
}

#[wasm_bindgen]
impl GallerySession {
    /// Build from the raw export response text
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Result<GallerySession, JsError> {
        let config = GalleryConfig::default();
        let session = Session::from_text(text, &config).map_err(|e| {
            web_sys::console::error_1(&JsValue::from_str(&format!("Error processing data: {}", e)));
            JsError::new(LOAD_FAILED_MESSAGE)
        })?;

        Ok(GallerySession {
            session,
            bar: FilterBar::new(config.buffer_zone_px),
            magnifier: Magnifier::new(config.magnifier),
            cards: ProximityObserver::new(config.lazy_margin_px),
        })
    }

    /// Debounced; call `tick` until it returns true
    #[wasm_bindgen(js_name = searchInput)]
    pub fn search_input(&mut self, text: &str, now: f64) {
        self.session.handle(Event::SearchInput(text.to_string()), millis(now));
    }

    /// Debounced; call `tick` until it returns true
    #[wasm_bindgen(js_name = rollWidthInput)]
    pub fn roll_width_input(&mut self, text: &str, now: f64) {
        self.session.handle(Event::RollWidthInput(text.to_string()), millis(now));
    }

    /// Flip one checkbox. `field` is a query key ("band_width") or element id ("bandWidthFilter").
    pub fn toggle(&mut self, field: &str, value: &str, now: f64) -> Result<(), JsError> {
        let field = FilterField::parse(field)
            .ok_or_else(|| JsError::new(&format!("unknown filter field: {}", field)))?;
        self.session.handle(
            Event::Toggle {
                field,
                value: value.to_string(),
            },
            millis(now),
        );
        Ok(())
    }

    pub fn reset(&mut self, now: f64) {
        self.session.handle(Event::Reset, millis(now));
    }

    /// True when a settled input re-filtered the gallery
    pub fn tick(&mut self, now: f64) -> bool {
        self.session.tick(millis(now))
    }

    #[wasm_bindgen(js_name = pendingDeadline)]
    pub fn pending_deadline(&self) -> Option<f64> {
        self.session.pending_deadline().map(|d| d as f64)
    }

    #[wasm_bindgen(js_name = visibleCount)]
    pub fn visible_count(&self) -> u32 {
        self.session.visible_count() as u32
    }

    #[wasm_bindgen(js_name = galleryHtml)]
    pub fn gallery_html(&self) -> String {
        self.session.render_gallery()
    }

    #[wasm_bindgen(js_name = detailHtml)]
    pub fn detail_html(&self, index: u32) -> Option<String> {
        self.session.render_detail(index as usize)
    }

    /// Selectable values per field, keyed like the query string
    pub fn options(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.session.options()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Whether a click on `target` ("close", "backdrop" or "content") closes the detail view
    #[wasm_bindgen(js_name = modalClickDismisses)]
    pub fn modal_click_dismisses(target: &str) -> bool {
        modal_click(target).map(ModalClick::dismisses).unwrap_or(false)
    }

    /// New filter bar state after a scroll, or undefined when nothing changed
    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self, position: f64, header_height: f64, controls_height: f64) -> Option<String> {
        self.bar
            .on_scroll(ScrollMetrics {
                position,
                header_height,
                controls_height,
            })
            .map(|state| bar_state_name(state).to_string())
    }

    #[wasm_bindgen(js_name = toggleFilterBar)]
    pub fn toggle_filter_bar(&mut self, position: f64) -> String {
        bar_state_name(self.bar.toggle(position)).to_string()
    }

    #[wasm_bindgen(js_name = filterBarState)]
    pub fn filter_bar_state(&self) -> String {
        bar_state_name(self.bar.state()).to_string()
    }

    /// `{ state, shownAt }` for the filter bar
    #[wasm_bindgen(js_name = filterBar)]
    pub fn filter_bar(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&BarView::of(&self.bar)).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Lens placement for a pointer over the detail image, or null when off the image
    pub fn lens(&self, x: f64, y: f64, width: f64, height: f64) -> Result<JsValue, JsError> {
        match self.magnifier.lens(Point { x, y }, Size { width, height }) {
            Some(lens) => serde_wasm_bindgen::to_value(&lens).map_err(|e| JsError::new(&e.to_string())),
            None => Ok(JsValue::NULL),
        }
    }

    /// Watch a lazily loaded card at its page offsets
    #[wasm_bindgen(js_name = observeCard)]
    pub fn observe_card(&mut self, index: u32, top: f64, bottom: f64) {
        self.cards.observe(index, Span { top, bottom });
    }

    #[wasm_bindgen(js_name = unobserveCard)]
    pub fn unobserve_card(&mut self, index: u32) {
        self.cards.unobserve(&index);
    }

    /// Drop every watched card, e.g. before the grid is replaced
    #[wasm_bindgen(js_name = clearCards)]
    pub fn clear_cards(&mut self) {
        self.cards.clear();
    }

    /// Cards that came near the viewport; each is reported once
    #[wasm_bindgen(js_name = pollCards)]
    pub fn poll_cards(&mut self, scroll_top: f64, viewport_height: f64) -> Vec<u32> {
        self.cards.poll(Viewport {
            top: scroll_top,
            height: viewport_height,
        })
    }
}

/// Message to show in the grid when loading fails
#[wasm_bindgen(js_name = loadFailedMessage)]
pub fn load_failed_message() -> String {
    LOAD_FAILED_MESSAGE.to_string()
}

fn millis(now: f64) -> Millis {
    if now.is_finite() && now > 0.0 {
        now as Millis
    } else {
        0
    }
}

fn bar_state_name(state: BarState) -> &'static str {
    match state {
        BarState::Docked => "docked",
        BarState::FloatingHidden => "floating-hidden",
        BarState::FloatingVisible => "floating-visible",
    }
}

fn modal_click(target: &str) -> Option<ModalClick> {
    match target {
        "close" => Some(ModalClick::CloseControl),
        "backdrop" => Some(ModalClick::Backdrop),
        "content" => Some(ModalClick::Content),
        _ => None,
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("fabric gallery ready"));
}
