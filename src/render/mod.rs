//! HTML output for the gallery
//!
//! - [`gallery`]: the card grid (or the "no results" placeholder)
//! - [`detail`]: the expanded single-record view
//! - [`magnifier`]: lens geometry for the detail image
//! - [`page`]: the full document wrapping grid, filter bar and client glue
//!
//! Everything here produces strings; nothing talks to the network.

pub mod detail;
pub mod gallery;
pub mod magnifier;
pub mod page;

/// Escape text for element content and quoted attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
