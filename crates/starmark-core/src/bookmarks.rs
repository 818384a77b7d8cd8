// Bookmark operations over the storage port
use chrono::{DateTime, Utc};
use starmark_store::{Row, Storage, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::models::{format_timestamp, Bookmark, BookmarkField, NewBookmark};
use crate::Result;

pub const TABLE: &str = "bookmarks";

/// Column declarations for the bookmarks table
pub const SCHEMA: &[(&str, &str)] = &[
    ("id", "integer primary key autoincrement"),
    ("title", "text not null check (title <> '')"),
    ("url", "text not null check (url <> '')"),
    ("notes", "text"),
    ("date_added", "text not null"),
];

fn id_filter(id: i64) -> Row {
    let mut filter = Row::new();
    filter.insert(BookmarkField::Id.column().to_string(), Value::Integer(id));
    filter
}

pub fn create_schema(store: &dyn Storage) -> Result<()> {
    store.create_table(TABLE, SCHEMA)?;
    debug!("Bookmarks table ready");
    Ok(())
}

/// Insert a bookmark, stamping it with `timestamp` or the current time
///
/// Returns the id storage assigned. Title/url emptiness is left to the schema.
pub fn add(store: &dyn Storage, bookmark: &NewBookmark, timestamp: Option<DateTime<Utc>>) -> Result<i64> {
    let date_added = format_timestamp(timestamp.unwrap_or_else(Utc::now));

    let mut row = Row::new();
    row.insert("title".into(), Value::from(bookmark.title.as_str()));
    row.insert("url".into(), Value::from(bookmark.url.as_str()));
    row.insert("notes".into(), Value::from(bookmark.notes.clone()));
    row.insert("date_added".into(), Value::from(date_added));

    let id = store.insert(TABLE, &row)?;
    debug!("Added bookmark {} ({})", id, bookmark.url);
    Ok(id)
}

pub fn list(store: &dyn Storage, order_by: BookmarkField) -> Result<Vec<Bookmark>> {
    store
        .select(TABLE, Some(order_by.column()))?
        .iter()
        .map(Bookmark::from_row)
        .collect()
}

/// Delete by id. A missing id is not an error - zero rows just go away.
pub fn delete(store: &dyn Storage, id: i64) -> Result<usize> {
    let removed = store.delete(TABLE, &id_filter(id))?;
    info!("Deleted {} bookmark(s) with id {}", removed, id);
    Ok(removed)
}

/// Overwrite the given fields of bookmark `id`; same no-op rule as `delete`
///
/// Empty notes are stored as NULL, the same as adding without notes.
pub fn edit(store: &dyn Storage, id: i64, update: &BTreeMap<BookmarkField, String>) -> Result<usize> {
    let changes: Row = update
        .iter()
        .map(|(field, value)| {
            let value = match field {
                BookmarkField::Notes if value.is_empty() => Value::Null,
                _ => Value::from(value.as_str()),
            };
            (field.column().to_string(), value)
        })
        .collect();

    let touched = store.update(TABLE, &id_filter(id), &changes)?;
    info!("Updated {} bookmark(s) with id {}", touched, id);
    Ok(touched)
}
