//! Filter engine
//!
//! Two halves:
//!
//! - [`FilterOptions`] derives, per filterable field, the distinct values that
//!   appear among the valid-image records. These populate the multi-selects.
//! - [`FilterState`] holds what the user picked and decides, record by
//!   record, whether it stays visible.
//!
//! # Predicate
//!
//! All clauses must pass, and an empty selection never constrains:
//!
//! | Clause | Passes when |
//! |--------|-------------|
//! | search | lowercase term is in lowercase Name or SKU |
//! | Type, Family, Colour, Schedule, Status | value is selected (exact, case-sensitive) |
//! | Band Width | parsed number is one of the selected numbers |
//! | Roll Width | numeric roll width ≥ threshold, or threshold is 0 |
//!
//! Search is case-insensitive while the multi-selects match exactly. That
//! asymmetry is intentional: selections come from the derived value sets, so
//! they are always spelled exactly as in the sheet.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Type,
    Family,
    Colour,
    BandWidth,
    Schedule,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Type,
        FilterField::Family,
        FilterField::Colour,
        FilterField::BandWidth,
        FilterField::Schedule,
        FilterField::Status,
    ];

    /// Element id of the field's multi-select
    pub fn id(self) -> &'static str {
        match self {
            FilterField::Type => "typeFilter",
            FilterField::Family => "familyFilter",
            FilterField::Colour => "colourFilter",
            FilterField::BandWidth => "bandWidthFilter",
            FilterField::Schedule => "scheduleFilter",
            FilterField::Status => "statusFilter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Type => "Type",
            FilterField::Family => "Family",
            FilterField::Colour => "Colour",
            FilterField::BandWidth => "Band Width",
            FilterField::Schedule => "Schedule",
            FilterField::Status => "Status",
        }
    }

    /// Key used in query strings
    pub fn key(self) -> &'static str {
        match self {
            FilterField::Type => "type",
            FilterField::Family => "family",
            FilterField::Colour => "colour",
            FilterField::BandWidth => "band_width",
            FilterField::Schedule => "schedule",
            FilterField::Status => "status",
        }
    }

    /// Accepts either the query key or the element id
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == name || f.id() == name)
    }

    fn text(self, record: &Record) -> &str {
        match self {
            FilterField::Type => &record.kind,
            FilterField::Family => &record.family,
            FilterField::Colour => &record.colour,
            FilterField::BandWidth => &record.band_width_text,
            FilterField::Schedule => &record.schedule,
            FilterField::Status => &record.status,
        }
    }
}

/// Render a band width the way it appears in option lists
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Distinct selectable values per field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub family: Vec<String>,
    pub colour: Vec<String>,
    /// Ascending
    pub band_width: Vec<f64>,
    pub schedule: Vec<String>,
    pub status: Vec<String>,
}

impl FilterOptions {
    /// Text values keep first-seen order; band widths are sorted numerically
    pub fn derive<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();

        let distinct = |field: FilterField| -> Vec<String> {
            let mut seen = HashSet::new();
            records
                .iter()
                .map(|r| field.text(r))
                .filter(|v| !v.is_empty() && seen.insert(*v))
                .map(str::to_string)
                .collect()
        };

        let mut band_width: Vec<f64> = records.iter().filter_map(|r| r.band_width).collect();
        band_width.sort_by(|a, b| a.total_cmp(b));
        band_width.dedup();

        Self {
            kind: distinct(FilterField::Type),
            family: distinct(FilterField::Family),
            colour: distinct(FilterField::Colour),
            band_width,
            schedule: distinct(FilterField::Schedule),
            status: distinct(FilterField::Status),
        }
    }

    /// Option values for a field as checkbox text
    pub fn values(&self, field: FilterField) -> Vec<String> {
        match field {
            FilterField::Type => self.kind.clone(),
            FilterField::Family => self.family.clone(),
            FilterField::Colour => self.colour.clone(),
            FilterField::BandWidth => self.band_width.iter().map(|v| format_number(*v)).collect(),
            FilterField::Schedule => self.schedule.clone(),
            FilterField::Status => self.status.clone(),
        }
    }
}

/// Search term, per-field selections and the roll width threshold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    search: String,
    selections: HashMap<FilterField, BTreeSet<String>>,
    band_widths: Vec<f64>,
    min_roll_width: f64,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from URL query pairs. Keys may repeat; unknown keys are ignored.
    pub fn from_query(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        let mut state = Self::new();

        for (key, value) in pairs {
            match key.as_str() {
                "search" => state.set_search(&value),
                "roll_width" => state.set_roll_width_input(&value),
                other => {
                    if let Some(field) = FilterField::parse(other) {
                        state.select(field, &value);
                    }
                }
            }
        }

        Ok(state)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn min_roll_width(&self) -> f64 {
        self.min_roll_width
    }

    pub fn set_min_roll_width(&mut self, value: f64) {
        self.min_roll_width = if value.is_finite() { value } else { 0.0 };
    }

    /// Threshold from raw input text; blank or unparsable means unset
    pub fn set_roll_width_input(&mut self, text: &str) {
        self.set_min_roll_width(text.trim().parse::<f64>().unwrap_or(0.0));
    }

    /// Returns false when the value was already selected or is not a number
    /// for the band width field
    pub fn select(&mut self, field: FilterField, value: &str) -> bool {
        if field == FilterField::BandWidth {
            return match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && !self.band_widths.contains(&v) => {
                    self.band_widths.push(v);
                    true
                }
                _ => false,
            };
        }
        self.selections.entry(field).or_default().insert(value.to_string())
    }

    pub fn deselect(&mut self, field: FilterField, value: &str) -> bool {
        if field == FilterField::BandWidth {
            let Ok(v) = value.trim().parse::<f64>() else {
                return false;
            };
            let before = self.band_widths.len();
            self.band_widths.retain(|b| *b != v);
            return self.band_widths.len() != before;
        }
        self.selections
            .get_mut(&field)
            .map(|set| set.remove(value))
            .unwrap_or(false)
    }

    /// Flip a checkbox; returns whether it is now checked
    pub fn toggle(&mut self, field: FilterField, value: &str) -> bool {
        if self.is_selected(field, value) {
            self.deselect(field, value);
            false
        } else {
            self.select(field, value)
        }
    }

    pub fn is_selected(&self, field: FilterField, value: &str) -> bool {
        if field == FilterField::BandWidth {
            return value
                .trim()
                .parse::<f64>()
                .map(|v| self.band_widths.contains(&v))
                .unwrap_or(false);
        }
        self.selections
            .get(&field)
            .map(|set| set.contains(value))
            .unwrap_or(false)
    }

    /// Selected values for a field as checkbox text
    pub fn selected(&self, field: FilterField) -> Vec<String> {
        if field == FilterField::BandWidth {
            let mut values = self.band_widths.clone();
            values.sort_by(|a, b| a.total_cmp(b));
            return values.into_iter().map(format_number).collect();
        }
        self.selections
            .get(&field)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear every clause
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no clause constrains anything
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.min_roll_width == 0.0
            && self.band_widths.is_empty()
            && self.selections.values().all(|s| s.is_empty())
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record)
            && self.matches_selections(record)
            && self.matches_band_width(record)
            && self.matches_roll_width(record)
    }

    /// Keep matching items, preserving their order
    pub fn apply<'a>(&self, items: &[(usize, &'a Record)]) -> Vec<(usize, &'a Record)> {
        items
            .iter()
            .filter(|(_, r)| self.matches(r))
            .copied()
            .collect()
    }

    fn matches_search(&self, record: &Record) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        record.name.to_lowercase().contains(&term) || record.sku.to_lowercase().contains(&term)
    }

    fn matches_selections(&self, record: &Record) -> bool {
        self.selections
            .iter()
            .all(|(field, selected)| selected.is_empty() || selected.contains(field.text(record)))
    }

    fn matches_band_width(&self, record: &Record) -> bool {
        if self.band_widths.is_empty() {
            return true;
        }
        record
            .band_width
            .map(|v| self.band_widths.contains(&v))
            .unwrap_or(false)
    }

    fn matches_roll_width(&self, record: &Record) -> bool {
        self.min_roll_width == 0.0 || record.roll_width_value() >= self.min_roll_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog, sample_rows, RowSpec};

    fn visible_skus(state: &FilterState) -> Vec<String> {
        let catalog = catalog(&sample_rows());
        state
            .apply(&catalog.gallery())
            .iter()
            .map(|(_, r)| r.sku.clone())
            .collect()
    }

    // ==========================================================================
    // DERIVED OPTIONS
    // ==========================================================================
    //
    // Option lists only ever contain values from records that can actually be
    // shown. "Hidden Grey" has no image, so nothing about it may leak in.
    // ==========================================================================

    #[test]
    fn test_options_first_seen_order() {
        let catalog = catalog(&sample_rows());
        let options = FilterOptions::derive(catalog.gallery().iter().map(|(_, r)| *r));

        assert_eq!(options.kind, vec!["Linen", "Velvet", "Boucle", "Cotton"]);
        assert_eq!(options.family, vec!["Plain", "Luxe"]);
        assert_eq!(options.status, vec!["Active", "Discontinued"]);
    }

    #[test]
    fn test_band_width_options_sorted_numerically() {
        let catalog = catalog(&[
            RowSpec::new("A", "a").band_width("10"),
            RowSpec::new("B", "b").band_width("9 wide"),
            RowSpec::new("C", "c").band_width("2.5"),
            RowSpec::new("D", "d").band_width("9"),
            RowSpec::new("E", "e").band_width("Thick"),
        ]);
        let options = FilterOptions::derive(catalog.gallery().iter().map(|(_, r)| *r));

        assert_eq!(options.band_width, vec![2.5, 9.0, 10.0]);
        assert_eq!(options.values(FilterField::BandWidth), vec!["2.5", "9", "10"]);
    }

    #[test]
    fn test_options_exclude_invalid_image_records() {
        let catalog = catalog(&[
            RowSpec::new("A", "a").colour("Grey"),
            RowSpec::new("B", "b").colour("Orange").band_width("7").image(""),
        ]);
        let options = FilterOptions::derive(catalog.gallery().iter().map(|(_, r)| *r));

        assert_eq!(options.colour, vec!["Grey"]);
        assert!(options.band_width.is_empty());
    }

    #[test]
    fn test_options_skip_empty_values() {
        let catalog = catalog(&[RowSpec::new("A", "a").schedule(""), RowSpec::new("B", "b").schedule("B")]);
        let options = FilterOptions::derive(catalog.gallery().iter().map(|(_, r)| *r));
        assert_eq!(options.schedule, vec!["B"]);
    }

    // ==========================================================================
    // PREDICATE
    // ==========================================================================

    #[test]
    fn test_empty_state_shows_everything() {
        let state = FilterState::new();
        assert!(state.is_empty());
        assert_eq!(visible_skus(&state), vec!["F1", "F2", "GREY-9", "F5"]);
    }

    #[test]
    fn test_search_matches_name_or_sku_case_insensitive() {
        let mut state = FilterState::new();
        state.set_search("grey");
        // "Linen Grey" by name, "GREY-9" by SKU; "Hidden Grey" has no image
        assert_eq!(visible_skus(&state), vec!["F1", "GREY-9"]);

        state.set_search("GrEy");
        assert_eq!(visible_skus(&state), vec!["F1", "GREY-9"]);
    }

    #[test]
    fn test_multi_select_is_exact_and_case_sensitive() {
        let mut state = FilterState::new();
        state.select(FilterField::Type, "velvet");
        assert!(visible_skus(&state).is_empty());

        state.reset();
        state.select(FilterField::Type, "Velvet");
        state.select(FilterField::Type, "Cotton");
        assert_eq!(visible_skus(&state), vec!["F2", "F5"]);
    }

    #[test]
    fn test_clauses_are_conjunctive() {
        let mut state = FilterState::new();
        state.select(FilterField::Family, "Luxe");
        state.select(FilterField::Status, "Active");
        assert_eq!(visible_skus(&state), vec!["F2"]);
    }

    #[test]
    fn test_band_width_numeric_membership() {
        let mut state = FilterState::new();
        state.select(FilterField::BandWidth, "3");
        // "3 Thick" and "3" both parse to 3
        assert_eq!(visible_skus(&state), vec!["F1", "F5"]);

        state.select(FilterField::BandWidth, "2.5");
        assert_eq!(visible_skus(&state), vec!["F1", "GREY-9", "F5"]);
    }

    #[test]
    fn test_band_width_selection_rejects_non_numbers() {
        let mut state = FilterState::new();
        assert!(!state.select(FilterField::BandWidth, "Thick"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_roll_width_threshold_boundary() {
        let mut state = FilterState::new();
        state.set_roll_width_input("50");
        // 54, 60 and 50 pass; "45in" parses as 0 and fails
        assert_eq!(visible_skus(&state), vec!["F1", "F2", "F5"]);
    }

    #[test]
    fn test_roll_width_blank_input_is_unset() {
        let mut state = FilterState::new();
        state.set_roll_width_input("50");
        state.set_roll_width_input("");
        assert_eq!(state.min_roll_width(), 0.0);
        assert_eq!(visible_skus(&state).len(), 4);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let catalog = catalog(&sample_rows());
        let mut state = FilterState::new();
        state.set_search("e");
        state.select(FilterField::Colour, "Grey");

        let once = state.apply(&catalog.gallery());
        let twice = state.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reset_restores_full_valid_set() {
        let catalog = catalog(&sample_rows());
        let mut state = FilterState::new();
        state.set_search("navy");
        state.select(FilterField::BandWidth, "5");
        state.set_min_roll_width(55.0);
        assert_eq!(state.apply(&catalog.gallery()).len(), 1);

        state.reset();
        assert!(state.is_empty());
        assert_eq!(state.apply(&catalog.gallery()), catalog.gallery());
    }

    // ==========================================================================
    // SELECTION BOOKKEEPING
    // ==========================================================================

    #[test]
    fn test_toggle_flips_selection() {
        let mut state = FilterState::new();
        assert!(state.toggle(FilterField::Colour, "Grey"));
        assert!(state.is_selected(FilterField::Colour, "Grey"));
        assert!(!state.toggle(FilterField::Colour, "Grey"));
        assert!(!state.is_selected(FilterField::Colour, "Grey"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_band_width_toggle_uses_numeric_identity() {
        let mut state = FilterState::new();
        assert!(state.toggle(FilterField::BandWidth, "3"));
        assert!(state.is_selected(FilterField::BandWidth, "3.0"));
        assert!(!state.toggle(FilterField::BandWidth, "3.0"));
        assert!(state.selected(FilterField::BandWidth).is_empty());
    }

    #[test]
    fn test_field_parse_accepts_key_or_id() {
        assert_eq!(FilterField::parse("band_width"), Some(FilterField::BandWidth));
        assert_eq!(FilterField::parse("colourFilter"), Some(FilterField::Colour));
        assert_eq!(FilterField::parse("price"), None);
    }

    // ==========================================================================
    // QUERY STRINGS
    // ==========================================================================

    #[test]
    fn test_from_query_repeated_keys() {
        let state = FilterState::from_query("search=grey&type=Linen&type=Boucle&band_width=3&roll_width=50&page=2")
            .unwrap();

        assert_eq!(state.search(), "grey");
        assert_eq!(state.selected(FilterField::Type), vec!["Boucle", "Linen"]);
        assert_eq!(state.selected(FilterField::BandWidth), vec!["3"]);
        assert_eq!(state.min_roll_width(), 50.0);
    }

    #[test]
    fn test_from_query_decodes_escapes() {
        let state = FilterState::from_query("colour=Dove+Grey&status=On%20Hold").unwrap();
        assert!(state.is_selected(FilterField::Colour, "Dove Grey"));
        assert!(state.is_selected(FilterField::Status, "On Hold"));
    }

    #[test]
    fn test_from_empty_query() {
        assert!(FilterState::from_query("").unwrap().is_empty());
    }
}
