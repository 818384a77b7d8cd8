use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use starmark_store::{Row, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::{Error, Result};

/// Format GitHub uses for `starred_at`
pub const STARRED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A saved bookmark, exactly as it sits in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub notes: Option<String>,
    /// RFC 3339, UTC, microsecond precision
    pub date_added: String,
}

impl Bookmark {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row
                .get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| Error::InvalidRow("missing id".into()))?,
            title: text_column(row, "title")?,
            url: text_column(row, "url")?,
            notes: row.get("notes").and_then(Value::as_str).map(String::from),
            date_added: text_column(row, "date_added")?,
        })
    }
}

fn text_column(row: &Row, column: &str) -> Result<String> {
    row.get(column)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| Error::InvalidRow(format!("missing {}", column)))
}

/// Payload for the Add command - everything but the id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub notes: Option<String>,
}

impl NewBookmark {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Whose stars to pull, and whether to keep GitHub's starred_at as date_added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub account: String,
    pub preserve_remote_timestamps: bool,
}

/// Payload for the Edit command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub id: i64,
    pub update: BTreeMap<BookmarkField, String>,
}

/// Columns of the bookmarks table
///
/// Used both to pick the List ordering and as keys of an Edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkField {
    Id,
    Title,
    Url,
    Notes,
    #[default]
    #[serde(alias = "date-added")]
    DateAdded,
}

impl BookmarkField {
    pub fn column(&self) -> &'static str {
        match self {
            BookmarkField::Id => "id",
            BookmarkField::Title => "title",
            BookmarkField::Url => "url",
            BookmarkField::Notes => "notes",
            BookmarkField::DateAdded => "date_added",
        }
    }

    pub fn all() -> [BookmarkField; 5] {
        [
            BookmarkField::Id,
            BookmarkField::Title,
            BookmarkField::Url,
            BookmarkField::Notes,
            BookmarkField::DateAdded,
        ]
    }
}

impl std::fmt::Display for BookmarkField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for BookmarkField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|f| f.column() == wanted)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// How date_added is written - fixed width so text order is time order
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a GitHub `starred_at` value (`2020-01-02T03:04:05Z`)
pub fn parse_starred_at(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, STARRED_AT_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|source| Error::TimestampParse {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!("title".parse::<BookmarkField>().unwrap(), BookmarkField::Title);
        assert_eq!("date-added".parse::<BookmarkField>().unwrap(), BookmarkField::DateAdded);
        assert_eq!(" URL ".parse::<BookmarkField>().unwrap(), BookmarkField::Url);
        assert!(matches!(
            "colour".parse::<BookmarkField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_parse_starred_at() {
        let ts = parse_starred_at("2020-01-02T03:04:05Z").unwrap();
        assert_eq!(format_timestamp(ts), "2020-01-02T03:04:05.000000Z");
    }

    #[test]
    fn test_parse_starred_at_is_strict() {
        for bad in ["2020-01-02", "2020-01-02 03:04:05", "yesterday", ""] {
            assert!(
                matches!(parse_starred_at(bad), Err(Error::TimestampParse { .. })),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_timestamps_sort_as_text() {
        let early = Utc.with_ymd_and_hms(2019, 12, 31, 23, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(format_timestamp(early) < format_timestamp(late));
    }

    #[test]
    fn test_bookmark_from_row_with_null_notes() {
        let mut row = Row::new();
        row.insert("id".into(), Value::Integer(4));
        row.insert("title".into(), Value::from("A"));
        row.insert("url".into(), Value::from("http://a"));
        row.insert("notes".into(), Value::Null);
        row.insert("date_added".into(), Value::from("2020-01-02T03:04:05.000000Z"));

        let bookmark = Bookmark::from_row(&row).unwrap();
        assert_eq!(bookmark.id, 4);
        assert_eq!(bookmark.notes, None);
    }
}
