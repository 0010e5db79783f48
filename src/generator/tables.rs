//! Which tables a run writes.

use crate::key::TableTag;
use std::fmt;

/// Set of enabled tables.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSet(u16);

impl TableSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        TableTag::ALL.into_iter().collect()
    }

    /// Tables written by the reference run: district, customer, item and stock.
    pub fn reference() -> Self {
        [
            TableTag::District,
            TableTag::Customer,
            TableTag::Item,
            TableTag::Stock,
        ]
        .into_iter()
        .collect()
    }

    pub fn contains(&self, table: TableTag) -> bool {
        self.0 & Self::bit(table) != 0
    }

    pub fn contains_any(&self, tables: &[TableTag]) -> bool {
        tables.iter().any(|&t| self.contains(t))
    }

    pub fn insert(&mut self, table: TableTag) {
        self.0 |= Self::bit(table);
    }

    pub fn remove(&mut self, table: TableTag) {
        self.0 &= !Self::bit(table);
    }

    pub fn with(mut self, table: TableTag) -> Self {
        self.insert(table);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = TableTag> + '_ {
        TableTag::ALL.into_iter().filter(|&t| self.contains(t))
    }

    fn bit(table: TableTag) -> u16 {
        1 << table.as_u8()
    }
}

impl FromIterator<TableTag> for TableSet {
    fn from_iter<I: IntoIterator<Item = TableTag>>(iter: I) -> Self {
        let mut set = TableSet::empty();
        for table in iter {
            set.insert(table);
        }
        set
    }
}

impl std::str::FromStr for TableSet {
    type Err = String;

    /// Parse a comma-separated list of table names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<TableTag>)
            .collect()
    }
}

impl fmt::Debug for TableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|t| t.name())).finish()
    }
}
