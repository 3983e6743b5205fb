//! CSV export, one row per visible fabric

use crate::record::Field;
use crate::session::Session;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, session: &Session) -> io::Result<()> {
    let header: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
    writeln!(writer, "{},Image URL", header.join(","))?;

    for (_, record) in session.visible() {
        let mut cells: Vec<String> = Field::ALL.iter().map(|&f| escape(record.text(f))).collect();
        cells.push(escape(record.image_url().unwrap_or("")));
        writeln!(writer, "{}", cells.join(","))?;
    }

    Ok(())
}

/// Quote a cell when it holds a separator, quote or line break
fn escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
