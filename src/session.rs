//! Gallery session: the owner of everything one page view needs
//!
//! A [`Session`] holds the catalog from one fetch, the derived filter options,
//! the current filter state and the resulting visible subset. UI events come
//! in through [`Session::handle`]; the session decides whether to re-evaluate
//! right away (checkbox toggles, reset) or after the input settles (search
//! text, roll width).
//!
//! Time is passed in as milliseconds rather than read from a clock, so the
//! same session runs natively, in wasm and under test.

use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::error::Result;
use crate::filter::{FilterField, FilterOptions, FilterState};
use crate::record::Record;
use crate::render::detail;
use crate::render::gallery::{self, GalleryLayout, LoadMode};
use crate::sheet::Fetcher;
use std::time::Duration;
use tracing::debug;

/// Milliseconds on whatever monotonic clock the host uses
pub type Millis = u64;

/// Trailing-edge debounce: fires once, `delay` after the last schedule
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Millis,
    deadline: Option<Millis>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.as_millis() as Millis,
            deadline: None,
        }
    }

    /// (Re)start the settling period
    pub fn schedule(&mut self, now: Millis) {
        self.deadline = Some(now.saturating_add(self.delay));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// True exactly once when the deadline has passed
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SearchInput(String),
    RollWidthInput(String),
    Toggle { field: FilterField, value: String },
    Reset,
}

pub struct Session {
    catalog: Catalog,
    options: FilterOptions,
    state: FilterState,
    debouncer: Debouncer,
    layout: GalleryLayout,
    visible: Vec<usize>,
    evaluations: u64,
}

impl Session {
    pub fn new(catalog: Catalog, config: &GalleryConfig) -> Self {
        let options = FilterOptions::derive(catalog.gallery().into_iter().map(|(_, r)| r));
        let visible = catalog.gallery().into_iter().map(|(i, _)| i).collect();

        Self {
            catalog,
            options,
            state: FilterState::new(),
            debouncer: Debouncer::new(config.debounce),
            layout: GalleryLayout {
                margin: config.lazy_margin_px,
                ..GalleryLayout::default()
            },
            visible,
            evaluations: 0,
        }
    }

    /// Fetch and normalize, then start a session over the result
    pub fn load<F: Fetcher + ?Sized>(fetcher: &F, config: &GalleryConfig) -> Result<Self> {
        let catalog = Catalog::load(fetcher, &config.sheet_url, config.prefix_len, config.suffix_len)?;
        Ok(Self::new(catalog, config))
    }

    pub fn from_text(text: &str, config: &GalleryConfig) -> Result<Self> {
        let catalog = Catalog::from_text(text, config.prefix_len, config.suffix_len)?;
        Ok(Self::new(catalog, config))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn with_layout(mut self, layout: GalleryLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Visible records with their catalog index, in sheet order
    pub fn visible(&self) -> Vec<(usize, &Record)> {
        self.visible
            .iter()
            .filter_map(|&i| self.catalog.get(i).map(|r| (i, r)))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of times the filter has been applied since the session started
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Apply one UI event. Returns true when the visible set was re-evaluated.
    pub fn handle(&mut self, event: Event, now: Millis) -> bool {
        match event {
            Event::SearchInput(text) => {
                self.state.set_search(&text);
                self.debouncer.schedule(now);
                false
            }
            Event::RollWidthInput(text) => {
                self.state.set_roll_width_input(&text);
                self.debouncer.schedule(now);
                false
            }
            Event::Toggle { field, value } => {
                self.state.toggle(field, &value);
                self.evaluate();
                true
            }
            Event::Reset => {
                self.debouncer.cancel();
                self.state.reset();
                self.evaluate();
                true
            }
        }
    }

    /// Fire a settled debounce. Returns true when it re-evaluated.
    pub fn tick(&mut self, now: Millis) -> bool {
        if self.debouncer.poll(now) {
            self.evaluate();
            true
        } else {
            false
        }
    }

    pub fn pending_deadline(&self) -> Option<Millis> {
        self.debouncer.deadline()
    }

    /// Replace the whole filter state and re-evaluate immediately
    pub fn set_state(&mut self, state: FilterState) {
        self.debouncer.cancel();
        self.state = state;
        self.evaluate();
    }

    fn evaluate(&mut self) {
        let gallery = self.catalog.gallery();
        self.visible = self.state.apply(&gallery).into_iter().map(|(i, _)| i).collect();
        self.evaluations += 1;
        debug!(
            visible = self.visible.len(),
            total = gallery.len(),
            "filters applied"
        );
    }

    /// Grid contents. The first render lazy-loads by proximity; any render
    /// after a filter change loads eagerly.
    pub fn render_gallery(&self) -> String {
        let mode = if self.evaluations == 0 {
            LoadMode::Lazy(self.layout)
        } else {
            LoadMode::Eager
        };
        gallery::render(&self.visible(), &mode)
    }

    /// Detail view for a catalog index, if it is a gallery record
    pub fn render_detail(&self, index: usize) -> Option<String> {
        self.catalog
            .get(index)
            .filter(|r| r.has_valid_image())
            .map(|r| detail::render(index, r))
    }
}
