//! Generated rows and the sink they are pushed into.

use crate::key::TableTag;
use ahash::AHashMap;
use std::fmt;

/// Scalar attribute of a generated row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    /// Fixed-point value rendered with the given number of decimals.
    Decimal(f64, usize),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Decimal(n, precision) => write!(f, "{:.*}", precision, n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row: its composite key, the table it belongs to, and the computed attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: i64,
    pub tag: TableTag,
    pub attributes: Vec<Value>,
}

impl Row {
    pub fn new(key: i64, tag: TableTag, attributes: Vec<Value>) -> Self {
        Self {
            key,
            tag,
            attributes,
        }
    }
}

/// Destination for generated rows.
pub trait RowSink {
    /// Called once per enabled table before its first row, even if no rows follow.
    fn open_table(&mut self, table: TableTag) -> anyhow::Result<()>;

    fn write_row(&mut self, row: &Row) -> anyhow::Result<()>;
}

/// Keeps every row in memory, grouped by table.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub tables: AHashMap<TableTag, Vec<Row>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: TableTag) -> &[Row] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, table: TableTag) -> usize {
        self.rows(table).len()
    }
}

impl RowSink for MemorySink {
    fn open_table(&mut self, table: TableTag) -> anyhow::Result<()> {
        self.tables.entry(table).or_default();
        Ok(())
    }

    fn write_row(&mut self, row: &Row) -> anyhow::Result<()> {
        self.tables.entry(row.tag).or_default().push(row.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(-1000).to_string(), "-1000");
        assert_eq!(Value::Decimal(0.1, 4).to_string(), "0.1000");
        assert_eq!(Value::Decimal(3_000_000.0, 2).to_string(), "3000000.00");
        assert_eq!(Value::Text("abc".into()).to_string(), "abc");
    }

    #[test]
    fn test_memory_sink_open_without_rows() {
        let mut sink = MemorySink::new();
        sink.open_table(TableTag::Item).unwrap();
        assert!(sink.tables.contains_key(&TableTag::Item));
        assert_eq!(sink.count(TableTag::Item), 0);
        assert_eq!(sink.count(TableTag::Stock), 0);
    }
}
