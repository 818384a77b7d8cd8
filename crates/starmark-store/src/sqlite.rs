use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

use crate::{Result, Row, Storage, StoreError, Value};

/// Table store on top of a single SQLite connection
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - The bookmarks table fits in one file next to the config
/// - Doesn't require a separate process
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Throwaway database, gone when the store is dropped
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    fn execute(&self, sql: &str, values: Vec<&Value>) -> Result<usize> {
        debug!("SQL: {} ({} params)", sql, values.len());
        Ok(self.conn.execute(sql, params_from_iter(values))?)
    }
}

/// Names get spliced into SQL text, so only plain identifiers pass
fn ident(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

/// `a = ?3 AND b = ?4` style clause, numbering placeholders from `first`
fn placeholders<'r>(row: &'r Row, first: usize, sep: &str) -> Result<(String, Vec<&'r Value>)> {
    let mut parts = Vec::with_capacity(row.len());
    for (i, column) in row.keys().enumerate() {
        parts.push(format!("{} = ?{}", ident(column)?, first + i));
    }
    Ok((parts.join(sep), row.values().collect()))
}

impl Storage for SqliteStore {
    fn create_table(&self, table: &str, columns: &[(&str, &str)]) -> Result<()> {
        if columns.is_empty() {
            return Err(StoreError::EmptyClause("CREATE TABLE"));
        }

        let mut defs = Vec::with_capacity(columns.len());
        for (name, decl) in columns {
            defs.push(format!("{} {}", ident(name)?, decl));
        }

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            ident(table)?,
            defs.join(", ")
        );
        self.execute(&sql, Vec::new())?;
        Ok(())
    }

    fn insert(&self, table: &str, row: &Row) -> Result<i64> {
        if row.is_empty() {
            return Err(StoreError::EmptyClause("INSERT"));
        }

        let mut columns = Vec::with_capacity(row.len());
        for column in row.keys() {
            columns.push(ident(column)?);
        }
        let slots: Vec<String> = (1..=row.len()).map(|i| format!("?{}", i)).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(table)?,
            columns.join(", "),
            slots.join(", ")
        );
        self.execute(&sql, row.values().collect())?;
        Ok(self.conn.last_insert_rowid())
    }

    fn select(&self, table: &str, order_by: Option<&str>) -> Result<Vec<Row>> {
        let mut sql = format!("SELECT * FROM {}", ident(table)?);
        if let Some(column) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(ident(column)?);
        }
        debug!("SQL: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt.query_map([], |row| {
            let mut out = Row::new();
            for (i, name) in columns.iter().enumerate() {
                out.insert(name.clone(), Value::from(row.get_ref(i)?));
            }
            Ok(out)
        })?;

        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn update(&self, table: &str, filter: &Row, changes: &Row) -> Result<usize> {
        if changes.is_empty() {
            return Err(StoreError::EmptyClause("UPDATE SET"));
        }
        if filter.is_empty() {
            return Err(StoreError::EmptyClause("UPDATE WHERE"));
        }

        let (set, mut values) = placeholders(changes, 1, ", ")?;
        let (matching, filter_values) = placeholders(filter, changes.len() + 1, " AND ")?;
        values.extend(filter_values);

        let sql = format!("UPDATE {} SET {} WHERE {}", ident(table)?, set, matching);
        self.execute(&sql, values)
    }

    fn delete(&self, table: &str, filter: &Row) -> Result<usize> {
        if filter.is_empty() {
            return Err(StoreError::EmptyClause("DELETE WHERE"));
        }

        let (matching, values) = placeholders(filter, 1, " AND ")?;
        let sql = format!("DELETE FROM {} WHERE {}", ident(table)?, matching);
        self.execute(&sql, values)
    }
}
