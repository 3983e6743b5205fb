//! Static HTML gallery export

use crate::config::GalleryConfig;
use crate::render::page::{self, Page, PageMode};
use crate::report::Summary;
use crate::session::Session;
use std::io::{self, Write};

/// Page for the session's current view. Static pages carry every visible
/// detail view inline; live pages fetch them from the server.
pub fn page<'a>(session: &'a Session, config: &'a GalleryConfig, mode: PageMode) -> Page<'a> {
    let details = match mode {
        PageMode::Static => session
            .visible()
            .into_iter()
            .filter_map(|(index, _)| session.render_detail(index).map(|html| (index, html)))
            .collect(),
        PageMode::Live => Vec::new(),
    };

    Page {
        mode,
        options: session.options(),
        state: session.state(),
        gallery: session.render_gallery(),
        details,
        config,
        generated: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        summary: Summary::from_session(session).headline(),
    }
}

pub fn write<W: Write>(writer: &mut W, session: &Session, config: &GalleryConfig) -> io::Result<()> {
    page::write(writer, &page(session, config, PageMode::Static))
}
