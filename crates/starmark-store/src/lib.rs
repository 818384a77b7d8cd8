// SQLite-backed table store
// The bookmark commands only ever see the Storage trait, never the connection

pub mod error;
pub mod sqlite;
pub mod value;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use value::{Row, Value};

/// Key-based table store the commands are written against
///
/// Filters are equality matches AND-ed together. Table and column names are
/// checked as plain identifiers; values always travel as bound parameters.
pub trait Storage {
    /// Create `table` with the given `(column, declaration)` pairs unless it already exists
    fn create_table(&self, table: &str, columns: &[(&str, &str)]) -> Result<()>;

    /// Insert one row and return its rowid
    fn insert(&self, table: &str, row: &Row) -> Result<i64>;

    /// Fetch every row, optionally ordered by a column
    fn select(&self, table: &str, order_by: Option<&str>) -> Result<Vec<Row>>;

    /// Apply `changes` to rows matching `filter`, returning how many were touched
    fn update(&self, table: &str, filter: &Row, changes: &Row) -> Result<usize>;

    /// Remove rows matching `filter`, returning how many were removed
    fn delete(&self, table: &str, filter: &Row) -> Result<usize>;
}
