//! JSON export

use crate::filter::FilterOptions;
use crate::record::Record;
use crate::report::Summary;
use crate::session::Session;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct Export<'a> {
    summary: Summary,
    search: &'a str,
    min_roll_width: f64,
    options: &'a FilterOptions,
    records: Vec<&'a Record>,
}

pub fn write<W: Write>(writer: &mut W, session: &Session) -> io::Result<()> {
    let export = Export {
        summary: Summary::from_session(session),
        search: session.state().search(),
        min_roll_width: session.state().min_roll_width(),
        options: session.options(),
        records: session.visible().into_iter().map(|(_, r)| r).collect(),
    };

    serde_json::to_writer_pretty(&mut *writer, &export)?;
    writeln!(writer)?;
    Ok(())
}
