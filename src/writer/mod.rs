use crate::generator::{Row, RowSink};
use crate::key::TableTag;
use ahash::AHashMap;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
pub const ROW_BUFFER_COUNT: usize = 8192;

/// Which columns each CSV row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnMode {
    /// Composite key and numeric table tag only
    #[default]
    Keys,
    /// Key, tag and every computed attribute
    Full,
}

impl std::str::FromStr for ColumnMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keys" | "key" => Ok(ColumnMode::Keys),
            "full" | "all" => Ok(ColumnMode::Full),
            _ => Err(format!(
                "Unknown column mode: {}. Valid options: keys, full",
                s
            )),
        }
    }
}

impl std::fmt::Display for ColumnMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnMode::Keys => write!(f, "keys"),
            ColumnMode::Full => write!(f, "full"),
        }
    }
}

pub struct TableWriter {
    writer: BufWriter<File>,
    columns: ColumnMode,
    rows_written: u64,
    write_count: usize,
    max_row_buffer: usize,
}

impl TableWriter {
    pub fn new(filename: &Path, columns: ColumnMode) -> std::io::Result<Self> {
        let file = File::create(filename)?;
        let writer = BufWriter::with_capacity(WRITER_BUFFER_SIZE, file);

        Ok(Self {
            writer,
            columns,
            rows_written: 0,
            write_count: 0,
            max_row_buffer: ROW_BUFFER_COUNT,
        })
    }

    pub fn write_row(&mut self, row: &Row) -> std::io::Result<()> {
        write!(self.writer, "{},{}", row.key, row.tag.as_u8())?;
        if self.columns == ColumnMode::Full {
            for value in &row.attributes {
                write!(self.writer, ",{}", value)?;
            }
        }
        self.writer.write_all(b"\n")?;

        self.rows_written += 1;
        self.write_count += 1;
        if self.write_count >= self.max_row_buffer {
            self.write_count = 0;
            self.writer.flush()?;
        }

        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.write_count = 0;
        self.writer.flush()
    }
}

/// One CSV file per table under a single output directory.
pub struct WriterPool {
    output_dir: PathBuf,
    columns: ColumnMode,
    writers: AHashMap<TableTag, TableWriter>,
}

impl WriterPool {
    pub fn new(output_dir: PathBuf, columns: ColumnMode) -> Self {
        Self {
            output_dir,
            columns,
            writers: AHashMap::new(),
        }
    }

    pub fn file_path(&self, table: TableTag) -> PathBuf {
        self.output_dir.join(format!("{}.csv", table.name()))
    }

    pub fn get_writer(&mut self, table: TableTag) -> anyhow::Result<&mut TableWriter> {
        use std::collections::hash_map::Entry;

        match self.writers.entry(table) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let filename = self.output_dir.join(format!("{}.csv", table.name()));
                let writer = TableWriter::new(&filename, self.columns)
                    .with_context(|| format!("cannot open output file {}", filename.display()))?;
                Ok(entry.insert(writer))
            }
        }
    }

    pub fn rows_written(&self, table: TableTag) -> u64 {
        self.writers
            .get(&table)
            .map(TableWriter::rows_written)
            .unwrap_or(0)
    }

    /// Paths of every file opened so far, in table-tag order.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut tables: Vec<TableTag> = self.writers.keys().copied().collect();
        tables.sort();
        tables.into_iter().map(|t| self.file_path(t)).collect()
    }

    pub fn close_all(&mut self) -> std::io::Result<()> {
        for (_, writer) in self.writers.iter_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl RowSink for WriterPool {
    fn open_table(&mut self, table: TableTag) -> anyhow::Result<()> {
        self.get_writer(table)?;
        Ok(())
    }

    fn write_row(&mut self, row: &Row) -> anyhow::Result<()> {
        let writer = self.get_writer(row.tag)?;
        writer
            .write_row(row)
            .with_context(|| format!("failed to write {} row", row.tag.name()))
    }
}
