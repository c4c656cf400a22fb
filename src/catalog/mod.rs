//! The in-memory catalog: tables, their column schemas, and their rows.
//!
//! Grounded in the original engine's `Table`/`Column`/`Row` structures
//! (`db/table.c`), which kept schema and storage in one struct per table
//! and grew the row array geometrically. Here a `Vec<Row>` gets that
//! growth for free, so there is no separate capacity field to track.

use std::collections::HashMap;

use crate::error::{Error, ErrorKind, Result};
use crate::types::{DataType, Value};

/// A single column's schema within a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub is_primary_key: bool,
    pub allows_null: bool,
}

/// A single row, one value per column, indexed the same as the table's
/// column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

/// A table: its schema plus its rows, in insertion order.
///
/// `rowid` is a row's current 0-based position, not a stable identifier:
/// deleting a row compacts the array and shifts every later rowid down,
/// matching the original `table_delete_row`'s shift-up loop. There is no
/// tombstone bit (`is_deleted`); a deleted row's slot simply disappears.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn primary_key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.is_primary_key)
    }

    /// Append a new column to the schema. Existing rows are backfilled
    /// with `Null` in the new slot, mirroring the original's realloc-and-
    /// `memset`-to-zero loop over already-stored rows.
    fn add_column(&mut self, column: Column) {
        self.columns.push(column);
        for row in &mut self.rows {
            row.0.push(Value::Null);
        }
        log::debug!("table '{}': added column '{}'", self.name, self.columns.last().unwrap().name);
    }

    fn insert_row(&mut self, row: Row) {
        self.rows.push(row);
        log::debug!("table '{}': inserted row, {} total", self.name, self.rows.len());
    }

    /// Remove the row at `rowid`, shifting later rows down by one
    /// position: no tombstones, rowid is a live position.
    fn delete_row(&mut self, rowid: usize) -> Result<()> {
        if rowid >= self.rows.len() {
            return Err(Error::new(ErrorKind::OutOfRange(rowid)));
        }
        self.rows.remove(rowid);
        log::debug!("table '{}': deleted rowid {}, {} remain", self.name, rowid, self.rows.len());
        Ok(())
    }
}

/// Tunable limits on the catalog, analogous to the original's fixed
/// `MAX_TABLES` constant but expressed as a runtime value instead of a
/// compile-time `#define`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_tables: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_tables: 100 }
    }
}

/// The root container: every table known to the running session, looked
/// up by case-insensitive ASCII name, matching the original engine's
/// byte-wise name comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    tables: HashMap<String, Table>,
    config: EngineConfig,
}

impl Catalog {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tables: HashMap::new(),
            config,
        }
    }

    fn key(name: &str) -> String {
        name.to_ascii_lowercase()
    }

    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(&Self::key(name))
    }

    pub fn find_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(&Self::key(name))
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(&Self::key(name))
    }

    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.values().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<()> {
        if self.table_exists(name) {
            return Err(Error::new(ErrorKind::DuplicateTable(name.to_string())));
        }
        if self.tables.len() >= self.config.max_tables {
            return Err(Error::new(ErrorKind::CapacityExceeded(self.config.max_tables)));
        }

        let mut table = Table::new(name);
        table.columns = columns;
        log::info!("created table '{}' with {} column(s)", name, table.columns.len());
        self.tables.insert(Self::key(name), table);
        Ok(())
    }

    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if self.tables.remove(&Self::key(name)).is_none() {
            return Err(Error::new(ErrorKind::UnknownTable(name.to_string())));
        }
        log::info!("dropped table '{}'", name);
        Ok(())
    }

    pub fn add_column(&mut self, table: &str, column: Column) -> Result<()> {
        let table = self
            .find_table_mut(table)
            .ok_or_else(|| Error::new(ErrorKind::UnknownTable(table.to_string())))?;
        table.add_column(column);
        Ok(())
    }

    pub fn insert_row(&mut self, table: &str, row: Row) -> Result<()> {
        let table = self
            .find_table_mut(table)
            .ok_or_else(|| Error::new(ErrorKind::UnknownTable(table.to_string())))?;
        table.insert_row(row);
        Ok(())
    }

    pub fn delete_row(&mut self, table: &str, rowid: usize) -> Result<()> {
        let table = self
            .find_table_mut(table)
            .ok_or_else(|| Error::new(ErrorKind::UnknownTable(table.to_string())))?;
        table.delete_row(rowid)
    }

    pub fn update_cell(&mut self, table: &str, rowid: usize, column_index: usize, value: Value) -> Result<()> {
        let table = self
            .find_table_mut(table)
            .ok_or_else(|| Error::new(ErrorKind::UnknownTable(table.to_string())))?;
        match table.rows.get_mut(rowid) {
            Some(row) => {
                row.0[column_index] = value;
                Ok(())
            }
            None => Err(Error::new(ErrorKind::OutOfRange(rowid))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: DataType::Int,
            is_primary_key: false,
            allows_null: true,
        }
    }

    #[test]
    fn create_and_find_table_case_insensitively() {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog.create_table("Users", vec![sample_column("id")]).unwrap();
        assert!(catalog.find_table("USERS").is_some());
        assert!(catalog.find_table("users").is_some());
    }

    #[test]
    fn duplicate_table_is_rejected() {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog.create_table("t", vec![]).unwrap();
        let err = catalog.create_table("t", vec![]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DuplicateTable("t".to_string()));
    }

    #[test]
    fn capacity_exceeded_when_over_max_tables() {
        let mut catalog = Catalog::new(EngineConfig { max_tables: 1 });
        catalog.create_table("a", vec![]).unwrap();
        let err = catalog.create_table("b", vec![]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CapacityExceeded(1));
    }

    #[test]
    fn add_column_backfills_existing_rows_with_null() {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog.create_table("t", vec![sample_column("id")]).unwrap();
        catalog
            .insert_row("t", Row::new(vec![Value::Int(1)]))
            .unwrap();
        catalog.add_column("t", sample_column("age")).unwrap();

        let table = catalog.find_table("t").unwrap();
        assert_eq!(table.rows[0].0, vec![Value::Int(1), Value::Null]);
    }

    #[test]
    fn delete_row_compacts_and_shifts_rowids() {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog.create_table("t", vec![sample_column("id")]).unwrap();
        catalog.insert_row("t", Row::new(vec![Value::Int(1)])).unwrap();
        catalog.insert_row("t", Row::new(vec![Value::Int(2)])).unwrap();
        catalog.insert_row("t", Row::new(vec![Value::Int(3)])).unwrap();

        catalog.delete_row("t", 0).unwrap();

        let table = catalog.find_table("t").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].0, vec![Value::Int(2)]);
        assert_eq!(table.rows[1].0, vec![Value::Int(3)]);
    }

    #[test]
    fn unknown_table_operations_error() {
        let mut catalog = Catalog::new(EngineConfig::default());
        let err = catalog.drop_table("ghost").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownTable("ghost".to_string()));
    }

    #[test]
    fn delete_row_out_of_range_is_rejected() {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog.create_table("t", vec![sample_column("id")]).unwrap();
        catalog.insert_row("t", Row::new(vec![Value::Int(1)])).unwrap();

        let err = catalog.delete_row("t", 5).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::OutOfRange(5));
        assert_eq!(catalog.find_table("t").unwrap().rows.len(), 1);
    }

    #[test]
    fn update_cell_out_of_range_is_rejected() {
        let mut catalog = Catalog::new(EngineConfig::default());
        catalog.create_table("t", vec![sample_column("id")]).unwrap();

        let err = catalog.update_cell("t", 0, 0, Value::Int(9)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::OutOfRange(0));
    }
}
