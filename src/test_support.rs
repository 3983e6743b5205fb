//! Fixture builders shared by the unit tests

use crate::catalog::Catalog;
use crate::record::Field;
use serde_json::{json, Value};

pub fn wrap(payload: &str) -> String {
    format!("/*O_o*/\ngoogle.visualization.Query.setResponse({});", payload)
}

/// One sheet row with sensible defaults
#[derive(Debug, Clone)]
pub struct RowSpec {
    pub sku: String,
    pub name: String,
    pub kind: String,
    pub family: String,
    pub colour: String,
    pub band_width: String,
    pub roll_width: String,
    pub schedule: String,
    pub status: String,
    pub ordering: String,
    pub image: String,
}

impl RowSpec {
    pub fn new(sku: &str, name: &str) -> Self {
        Self {
            sku: sku.to_string(),
            name: name.to_string(),
            kind: "Linen".to_string(),
            family: "Plain".to_string(),
            colour: "Grey".to_string(),
            band_width: String::new(),
            roll_width: "54".to_string(),
            schedule: "A".to_string(),
            status: "Active".to_string(),
            ordering: "In Stock".to_string(),
            image: format!("example.com/{}.png", sku.to_lowercase()),
        }
    }

    pub fn kind(mut self, v: &str) -> Self { self.kind = v.to_string(); self }
    pub fn family(mut self, v: &str) -> Self { self.family = v.to_string(); self }
    pub fn colour(mut self, v: &str) -> Self { self.colour = v.to_string(); self }
    pub fn band_width(mut self, v: &str) -> Self { self.band_width = v.to_string(); self }
    pub fn roll_width(mut self, v: &str) -> Self { self.roll_width = v.to_string(); self }
    pub fn schedule(mut self, v: &str) -> Self { self.schedule = v.to_string(); self }
    pub fn status(mut self, v: &str) -> Self { self.status = v.to_string(); self }
    pub fn ordering(mut self, v: &str) -> Self { self.ordering = v.to_string(); self }
    pub fn image(mut self, v: &str) -> Self { self.image = v.to_string(); self }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Sku => &self.sku,
            Field::Type => &self.kind,
            Field::Name => &self.name,
            Field::Family => &self.family,
            Field::Colour => &self.colour,
            Field::BandWidth => &self.band_width,
            Field::RollWidth => &self.roll_width,
            Field::Schedule => &self.schedule,
            Field::Status => &self.status,
            Field::ImageLink => &self.image,
            Field::OrderingStatus => &self.ordering,
        }
    }
}

/// Wrapped export text containing the given rows
pub fn sheet_text(rows: &[RowSpec]) -> String {
    let cols: Vec<Value> = Field::ALL
        .iter()
        .enumerate()
        .map(|(i, f)| json!({ "id": format!("C{}", i), "label": f.label(), "type": "string" }))
        .collect();

    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            let cells: Vec<Value> = Field::ALL
                .iter()
                .map(|&f| {
                    let v = row.value(f);
                    if v.is_empty() { Value::Null } else { json!({ "v": v }) }
                })
                .collect();
            json!({ "c": cells })
        })
        .collect();

    wrap(&json!({ "version": "0.6", "status": "ok", "table": { "cols": cols, "rows": rows } }).to_string())
}

pub fn catalog(rows: &[RowSpec]) -> Catalog {
    Catalog::from_text(&sheet_text(rows), 47, 2).expect("fixture parses")
}

/// A small mixed catalog used across filter and session tests
pub fn sample_rows() -> Vec<RowSpec> {
    vec![
        RowSpec::new("F1", "Linen Grey").band_width("3 Thick").roll_width("54"),
        RowSpec::new("F2", "Velvet Navy").kind("Velvet").family("Luxe").colour("Blue").band_width("5").roll_width("60"),
        RowSpec::new("GREY-9", "Boucle Cream").kind("Boucle").colour("Cream").band_width("2.5mm").roll_width("45in").ordering("Low Stock"),
        RowSpec::new("F4", "Hidden Grey").image(""),
        RowSpec::new("F5", "Cotton Sand").kind("Cotton").family("Luxe").colour("Sand").band_width("3").roll_width("50").status("Discontinued"),
    ]
}
