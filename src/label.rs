//! # Identifier Parsing
//!
//! Turns raw Homebox record names into structured label entries. A record
//! name like `BOX.001 | Camping gear` carries a human-readable identifier
//! before the separator and the display name after it. The identifier
//! portion, when it matches `TYPE.NUMBER`, is split into a type tag and a
//! zero-padded number so that fixed-width IDs sort and align consistently
//! across labels.
//!
//! Parsing is a pure function of the input and the configured pattern: it
//! never fails. Names that don't match the pattern simply become labels
//! without an identifier.

use std::cmp::Ordering;

use regex::Regex;

use crate::error::LabelError;

/// Default two-group pattern: identifier portion, display name.
pub const DEFAULT_ID_PATTERN: &str = r"^\s*([^|]+?)\s*\|\s*(.*)$";

/// Default zero-padding width for parsed identifier numbers.
pub const DEFAULT_PAD_WIDTH: usize = 3;

/// Placeholder used for records with blank names.
const UNNAMED: &str = "Unnamed";

/// One inventory entry fetched from the Homebox API.
///
/// `url` is the dashboard deep-link encoded into the label's QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A record's name, parsed into label-ready parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    /// Identifier type tag (`BOX`, `RACK`, ...); empty when the name
    /// carried no identifier.
    pub tag: String,
    /// Numeric identifier component, absent for opaque identifiers.
    pub number: Option<u32>,
    /// Identifier as rendered on the label (`BOX.001`), zero-padded when
    /// numeric, the opaque identifier portion otherwise, or empty.
    pub display_id: String,
    /// Cleaned display name.
    pub name: String,
    /// The record this label was derived from.
    pub record: Record,
}

impl ParsedLabel {
    /// Whether the record name carried any identifier at all.
    pub fn has_id(&self) -> bool {
        !self.display_id.is_empty()
    }

    /// Deterministic ordering: tagged labels first (by tag, then number),
    /// untagged labels after, ties broken by record id.
    pub fn sort_key_cmp(&self, other: &Self) -> Ordering {
        match (self.has_id(), other.has_id()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => (self.tag.as_str(), self.number, self.record.id.as_str()).cmp(&(
                other.tag.as_str(),
                other.number,
                other.record.id.as_str(),
            )),
        }
    }
}

/// Compiled identifier pattern with its padding configuration.
///
/// The pattern must expose two capture groups: the identifier portion and
/// the remaining display name.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    split: Regex,
    type_number: Regex,
    pad_width: usize,
}

impl LabelPattern {
    /// Compile a custom two-group pattern.
    pub fn new(pattern: &str, pad_width: usize) -> Result<Self, LabelError> {
        Ok(Self {
            split: Regex::new(pattern)?,
            type_number: Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*)\.([0-9]+)$")
                .expect("static pattern"),
            pad_width,
        })
    }

    /// Parse one record into a [`ParsedLabel`]. Never fails: a name that
    /// doesn't match the pattern yields a label with an empty identifier.
    pub fn parse(&self, record: &Record) -> ParsedLabel {
        let text = display_text(&record.name);

        let Some(caps) = self.split.captures(&text) else {
            return ParsedLabel {
                tag: String::new(),
                number: None,
                display_id: String::new(),
                name: text,
                record: record.clone(),
            };
        };

        let ident = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let mut name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("").to_string();
        if name.is_empty() {
            // Fall back to the whole text when the portion after the
            // separator is blank, so no information is lost.
            name = text.replace('|', " ").trim().to_string();
        }

        let (tag, number, display_id) = self.split_identifier(ident);

        ParsedLabel {
            tag,
            number,
            display_id,
            name,
            record: record.clone(),
        }
    }

    /// Split an identifier portion into `(tag, number, display_id)`.
    ///
    /// `TYPE.NUMBER` identifiers are zero-padded to the configured width;
    /// anything else is kept as an opaque display id.
    fn split_identifier(&self, ident: &str) -> (String, Option<u32>, String) {
        if ident.is_empty() {
            return (String::new(), None, String::new());
        }

        if let Some(caps) = self.type_number.captures(ident) {
            let tag = caps[1].to_string();
            if let Ok(number) = caps[2].parse::<u32>() {
                let display_id = format!("{}.{:0width$}", tag, number, width = self.pad_width);
                return (tag, Some(number), display_id);
            }
        }

        (String::new(), None, ident.to_string())
    }

    /// Parse a batch of records, preserving input order.
    pub fn parse_all(&self, records: &[Record]) -> Vec<ParsedLabel> {
        records.iter().map(|record| self.parse(record)).collect()
    }
}

impl Default for LabelPattern {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PATTERN, DEFAULT_PAD_WIDTH).expect("default pattern compiles")
    }
}

/// Normalize a user-provided record name for display.
fn display_text(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> Record {
        Record::new("loc-1", name, "https://homebox.test/location/loc-1")
    }

    #[test]
    fn test_parse_type_number_identifier() {
        let pattern = LabelPattern::default();
        let label = pattern.parse(&record("BOX.001 | Tools"));
        assert_eq!(label.tag, "BOX");
        assert_eq!(label.number, Some(1));
        assert_eq!(label.display_id, "BOX.001");
        assert_eq!(label.name, "Tools");
    }

    #[test]
    fn test_parse_pads_short_numbers() {
        let pattern = LabelPattern::default();
        let label = pattern.parse(&record("RACK.5 | Shelf A"));
        assert_eq!(label.display_id, "RACK.005");
        assert_eq!(label.number, Some(5));
    }

    #[test]
    fn test_parse_custom_pad_width() {
        let pattern = LabelPattern::new(DEFAULT_ID_PATTERN, 4).unwrap();
        let label = pattern.parse(&record("BIN.42 | Screws"));
        assert_eq!(label.display_id, "BIN.0042");
    }

    #[test]
    fn test_parse_opaque_identifier() {
        let pattern = LabelPattern::default();
        let label = pattern.parse(&record("A-17 | Garage wall"));
        assert_eq!(label.tag, "");
        assert_eq!(label.number, None);
        assert_eq!(label.display_id, "A-17");
        assert_eq!(label.name, "Garage wall");
    }

    #[test]
    fn test_parse_no_separator() {
        let pattern = LabelPattern::default();
        let label = pattern.parse(&record("no id here"));
        assert!(!label.has_id());
        assert_eq!(label.name, "no id here");
    }

    #[test]
    fn test_parse_blank_name_after_separator() {
        let pattern = LabelPattern::default();
        let label = pattern.parse(&record("BOX.002 | "));
        assert_eq!(label.display_id, "BOX.002");
        assert_eq!(label.name, "BOX.002");
    }

    #[test]
    fn test_parse_empty_name() {
        let pattern = LabelPattern::default();
        let label = pattern.parse(&record("   "));
        assert_eq!(label.name, "Unnamed");
        assert!(!label.has_id());
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        assert!(LabelPattern::new("([unclosed", DEFAULT_PAD_WIDTH).is_err());
    }

    #[test]
    fn test_sort_tagged_before_untagged() {
        let pattern = LabelPattern::default();
        let mut labels = pattern.parse_all(&[
            record("no id"),
            record("BOX.2 | b"),
            record("BOX.1 | a"),
        ]);
        labels.sort_by(|a, b| a.sort_key_cmp(b));
        assert_eq!(labels[0].display_id, "BOX.001");
        assert_eq!(labels[1].display_id, "BOX.002");
        assert!(!labels[2].has_id());
    }
}
