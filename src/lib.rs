//! Fabric Gallery - browse a fabric sample sheet as a filterable image gallery
//!
//! Fabric Gallery reads the "Sample Fabrics" Google Sheet through its gviz JSON
//! export, turns each row into a typed [`Record`], and renders the ones with a
//! usable image as a card grid with multi-select filters, free-text search and
//! a roll width threshold.
//!
//! # Pipeline
//!
//! 1. **Fetch** ([`sheet::fetch`]): one GET against the export endpoint, or a
//!    saved copy from disk.
//! 2. **Parse** ([`sheet::parse`]): strip the fixed `setResponse(` wrapper and
//!    decode the table.
//! 3. **Normalize** ([`record`]): map header labels to fields, stringify cells,
//!    extract band widths and validate image links.
//! 4. **Filter** ([`filter`]): derive option sets, then apply the current state.
//! 5. **Render** ([`render`]): cards, detail views and the page around them.
//!
//! A [`Session`] ties these together for one page view and decides when a
//! filter change re-evaluates (immediately for toggles, after the input
//! settles for text).
//!
//! # Quick Start
//!
//! ```no_run
//! use fabric_gallery::sheet::FileFetcher;
//! use fabric_gallery::{FilterField, FilterState, GalleryConfig, Session};
//!
//! let config = GalleryConfig::default();
//! let mut session = Session::load(&FileFetcher::new("export.txt"), &config)?;
//!
//! let mut state = FilterState::new();
//! state.set_search("grey");
//! state.select(FilterField::Family, "Plain");
//! session.set_state(state);
//!
//! for (_, record) in session.visible() {
//!     println!("{} {}", record.sku, record.display_name());
//! }
//! # Ok::<(), fabric_gallery::GalleryError>(())
//! ```
//!
//! # Modules
//!
//! - [`sheet`]: export retrieval and decoding
//! - [`record`]: the normalized fabric record
//! - [`catalog`]: the record set from one fetch
//! - [`filter`]: option derivation and the filter predicate
//! - [`session`]: event handling and debouncing for one page view
//! - [`render`]: HTML for cards, detail views and the page
//! - [`lazy`]: near-viewport detection for deferred image loading
//! - [`toolbar`]: the floating filter bar state machine
//! - [`report`]: HTML, JSON and CSV snapshots
//! - `serve`: the live preview server (feature `net`)

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod lazy;
pub mod record;
pub mod render;
pub mod report;
#[cfg(feature = "net")]
pub mod serve;
pub mod session;
pub mod sheet;
pub mod toolbar;

#[cfg(test)]
mod test_support;

pub use catalog::Catalog;
pub use config::{GalleryConfig, MagnifierConfig};
pub use error::{GalleryError, Result, LOAD_FAILED_MESSAGE};
pub use filter::{FilterField, FilterOptions, FilterState};
pub use record::{Field, ImageLinkError, Record};
pub use session::{Event, Millis, Session};
pub use toolbar::{BarState, FilterBar};
