//! Decoding of raw pwhois responses into typed records.
//!
//! Two strategies are shared by the four record kinds:
//! - attribute blocks: `Key: Value` lines grouped by blank lines (IP, registry)
//! - sections: `Key: Value` header lines followed by positional data rows
//!   (routeview, netblock)

pub mod classify;
pub mod ip;
pub mod netblock;
pub mod registry;
pub mod routeview;

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{PwhoisError, Result};
use crate::protocol::QueryKind;
use crate::records::Records;

/// Timestamp layout used throughout pwhois responses, e.g. `Jan 02 2006 15:04:05`
pub const TIMESTAMP_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// Date-only layout used by netblock register/update columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between key and value in attribute lines
pub const ATTRIBUTE_SEPARATOR: &str = ": ";

/// Classify and decode a raw response for the given query kind.
///
/// Service-signaled quota failures are reported before any structural
/// parsing happens.
pub fn parse_response(kind: QueryKind, response: &str) -> Result<Records> {
    classify::check(response)?;
    decode(kind, response)
}

/// Decode without running the error classifier
pub fn decode(kind: QueryKind, response: &str) -> Result<Records> {
    let records = match kind {
        QueryKind::Ip => Records::Ip(ip::parse(response)?),
        QueryKind::RouteView => Records::RouteView(routeview::parse(response)?),
        QueryKind::Netblock => Records::Netblock(netblock::parse(response)?),
        QueryKind::Registry => Records::Registry(registry::parse(response)?),
    };
    debug!(%kind, empty = records.is_empty(), "Decoded pwhois response");
    Ok(records)
}

/// `Key: Value` pairs of one block or header section
#[derive(Debug, Default)]
pub struct Attributes<'a> {
    pairs: HashMap<&'a str, &'a str>,
}

impl<'a> Attributes<'a> {
    /// Collect pairs from lines, ignoring lines without a separator.
    /// A repeated key keeps its last value.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pairs = lines
            .into_iter()
            .filter_map(|line| line.split_once(ATTRIBUTE_SEPARATOR))
            .map(|(key, value)| (key.trim(), value.trim()))
            .collect();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.get(key).copied()
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn float(&self, key: &str) -> f64 {
        self.get(key).map(parse_float).unwrap_or_default()
    }

    pub fn int(&self, key: &str) -> i64 {
        self.get(key).map(parse_int).unwrap_or_default()
    }

    pub fn boolean(&self, key: &str) -> bool {
        self.get(key).map(parse_bool).unwrap_or_default()
    }

    pub fn timestamp(&self, key: &str) -> NaiveDateTime {
        self.get(key).map(parse_timestamp).unwrap_or_default()
    }
}

/// Group lines into blocks separated by blank lines.
/// Blocks never contain blank lines and are never empty.
pub fn split_blocks(response: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in response.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse an attribute-block response, decoding each block with `decode`.
///
/// Blocks that carry no `Key: Value` pair produce no record.
pub fn parse_attribute_blocks<T, F>(response: &str, decode: F) -> Result<Vec<T>>
where
    F: Fn(&Attributes<'_>) -> T,
{
    if response.is_empty() {
        return Err(PwhoisError::EmptyResponse);
    }

    let blocks = split_blocks(response);
    if blocks.is_empty() {
        return Err(PwhoisError::EmptyResponse);
    }

    let total = blocks.len();
    let records: Vec<T> = blocks
        .into_iter()
        .map(Attributes::from_lines)
        .filter(|attributes| !attributes.is_empty())
        .map(|attributes| decode(&attributes))
        .collect();

    if records.len() < total {
        debug!(
            skipped = total - records.len(),
            "Ignored blocks without attributes"
        );
    }
    Ok(records)
}

/// Header lines and data rows of a sectioned response
#[derive(Debug, Default)]
pub struct Sections<'a> {
    pub header: Vec<&'a str>,
    pub rows: Vec<&'a str>,
}

impl<'a> Sections<'a> {
    /// Split a response into header lines and data rows.
    ///
    /// `row` recognises a data row and returns its content (with any row
    /// marker removed). Other lines holding `": "` are header lines, the rest
    /// are dropped.
    pub fn split<F>(response: &'a str, row: F) -> Self
    where
        F: Fn(&'a str) -> Option<&'a str>,
    {
        let mut sections = Sections::default();

        for line in response.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(content) = row(line) {
                sections.rows.push(content);
            } else if line.contains(ATTRIBUTE_SEPARATOR) {
                sections.header.push(line);
            }
        }

        sections
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes::from_lines(self.header.iter().copied())
    }

    /// Fail when either section is missing
    pub fn require_both(&self) -> Result<()> {
        if self.header.is_empty() {
            return Err(PwhoisError::NoHeader);
        }
        if self.rows.is_empty() {
            return Err(PwhoisError::NoDataRows);
        }
        Ok(())
    }
}

/// Whitespace-separated fields of a data row
pub fn fields(row: &str) -> Vec<&str> {
    row.split_whitespace().collect()
}

/// Field at `index`, or an empty string when the row is shorter
pub fn field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or_default()
}

/// Join the fields at `indices` with single spaces and parse as a timestamp
pub fn joined_timestamp(fields: &[&str], indices: &[usize]) -> NaiveDateTime {
    let joined = indices
        .iter()
        .map(|&index| field(fields, index))
        .collect::<Vec<_>>()
        .join(" ");
    parse_timestamp(&joined)
}

pub fn parse_timestamp(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).unwrap_or_default()
}

pub fn parse_date(value: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub fn parse_float(value: &str) -> f64 {
    value.trim().parse().unwrap_or_default()
}

pub fn parse_int(value: &str) -> i64 {
    value.trim().parse().unwrap_or_default()
}

pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "t" | "true" | "y" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_split_blocks() {
        let blocks = split_blocks("IP: 8.8.8.8\nCity: A\n\n\nIP: 1.1.1.1\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], vec!["IP: 8.8.8.8", "City: A"]);
        assert_eq!(blocks[1], vec!["IP: 1.1.1.1"]);
    }

    #[test]
    fn test_split_blocks_crlf() {
        let blocks = split_blocks("IP: 8.8.8.8\r\n\r\nIP: 1.1.1.1\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], vec!["IP: 1.1.1.1"]);
    }

    #[test]
    fn test_split_blocks_blank_only() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n").is_empty());
        assert!(split_blocks("  \n\t\n").is_empty());
    }

    #[test]
    fn test_attributes_first_separator_only() {
        let attributes = Attributes::from_lines(["Comment: note: with colon", "Broken line"]);
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.text("Comment"), "note: with colon");
        assert_eq!(attributes.text("Missing"), "");
    }

    #[test]
    fn test_attributes_case_exact() {
        let attributes = Attributes::from_lines(["City: Mountain View"]);
        assert_eq!(attributes.get("city"), None);
        assert_eq!(attributes.get("City"), Some("Mountain View"));
    }

    #[test]
    fn test_attributes_numbers_default_to_zero() {
        let attributes = Attributes::from_lines(["Latitude: north", "Longitude: -122.5", "TS: 12x"]);
        assert_eq!(attributes.float("Latitude"), 0.0);
        assert_eq!(attributes.float("Longitude"), -122.5);
        assert_eq!(attributes.int("TS"), 0);
        assert_eq!(attributes.int("Absent"), 0);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("Jan 02 2006 15:04:05");
        assert_eq!((ts.year(), ts.month(), ts.day()), (2006, 1, 2));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (15, 4, 5));
        assert_eq!(parse_timestamp("not a date"), NaiveDateTime::default());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2010-07-09");
        assert_eq!((date.year(), date.month(), date.day()), (2010, 7, 9));
        assert_eq!(date.hour(), 0);
        assert_eq!(parse_date("09/07/2010"), NaiveDateTime::default());
    }

    #[test]
    fn test_joined_timestamp_short_row() {
        let row = fields("a Mar 15 2021 10:11:12");
        let ts = joined_timestamp(&row, &[1, 2, 3, 4]);
        assert_eq!((ts.year(), ts.month(), ts.day()), (2021, 3, 15));
        assert_eq!(joined_timestamp(&row, &[5, 6, 7, 8]), NaiveDateTime::default());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("Y"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_attribute_blocks_empty() {
        let result = parse_attribute_blocks("", |a| a.text("IP"));
        assert!(matches!(result, Err(PwhoisError::EmptyResponse)));

        let result = parse_attribute_blocks("\n", |a| a.text("IP"));
        assert!(matches!(result, Err(PwhoisError::EmptyResponse)));
    }

    #[test]
    fn test_attribute_blocks_skip_blocks_without_pairs() {
        let records = parse_attribute_blocks("garbage\n\nIP: 8.8.8.8\n", |a| a.text("IP")).unwrap();
        assert_eq!(records, vec!["8.8.8.8".to_string()]);

        let records = parse_attribute_blocks("garbage only\n", |a| a.text("IP")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_sections_split() {
        let response = "AS: 1\nOrg-Name: Example\n*> 1 2 3\nnoise\n\n*> 4 5 6\n";
        let sections = Sections::split(response, |line| line.strip_prefix("*>"));
        assert_eq!(sections.header, vec!["AS: 1", "Org-Name: Example"]);
        assert_eq!(sections.rows, vec![" 1 2 3", " 4 5 6"]);
        assert!(sections.require_both().is_ok());
        assert_eq!(sections.attributes().text("Org-Name"), "Example");
    }

    #[test]
    fn test_sections_require_both() {
        let sections = Sections::split("*> 1 2 3\n", |line| line.strip_prefix("*>"));
        assert!(matches!(sections.require_both(), Err(PwhoisError::NoHeader)));

        let sections = Sections::split("AS: 1\n", |line| line.strip_prefix("*>"));
        assert!(matches!(sections.require_both(), Err(PwhoisError::NoDataRows)));
    }

    #[test]
    fn test_decode_dispatches_by_kind() {
        let records = decode(QueryKind::Ip, "IP: 8.8.8.8\n").unwrap();
        assert!(matches!(records, Records::Ip(ref r) if r.len() == 1));

        let records = decode(QueryKind::Registry, "Org-Name: Example\n").unwrap();
        assert!(matches!(records, Records::Registry(ref r) if r[0].org_name == "Example"));
    }

    #[test]
    fn test_parse_response_checks_quota_first() {
        let response = "IP: 8.8.8.8\n\nError: Error: Daily query limit exceeded\n";
        let err = parse_response(QueryKind::Ip, response).unwrap_err();
        assert!(matches!(err, PwhoisError::QuotaExceeded(_)));
    }
}
