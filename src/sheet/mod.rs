//! Sheet ingestion: fetch the gviz export and decode it into a table
//!
//! The export endpoint does not return plain JSON. It wraps the payload in a
//! JavaScript callback:
//!
//! ```text
//! /*O_o*/
//! google.visualization.Query.setResponse({"table":{"cols":[...],"rows":[...]}});
//! ```
//!
//! [`fetch`] gets the raw text, [`parse`] strips the wrapper and exposes the
//! columns and rows. Turning rows into typed records is [`crate::record`]'s job.

pub mod fetch;
pub mod parse;

pub use fetch::{FileFetcher, Fetcher};
#[cfg(feature = "net")]
pub use fetch::HttpFetcher;
pub use parse::{Cell, Column, ColumnIndex, Row, SheetTable};
