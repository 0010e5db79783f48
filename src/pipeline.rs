//! Runs the generators in their fixed order and routes rows to the table files.
//!
//! The generators share one random stream, consumed in this order:
//! warehouses, districts, customers (and history), items, stock, orders.
//! A step runs only if at least one of its tables is enabled; a skipped step
//! draws nothing, so the reference run (warehouses and orders disabled)
//! starts drawing at the item prices.

use crate::generator::{Cardinalities, Generator, Row, RowSink, TableSet, ORDER_FAMILY};
use crate::key::{self, TableTag};
use crate::random::DEFAULT_SEED;
use crate::writer::{ColumnMode, WriterPool};
use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;

/// Rows between two progress notifications for the same table.
const PROGRESS_INTERVAL: u64 = 10_000;

/// One generator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Warehouses,
    Districts,
    CustomersAndHistory,
    Items,
    Stock,
    Orders,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Warehouses,
        Step::Districts,
        Step::CustomersAndHistory,
        Step::Items,
        Step::Stock,
        Step::Orders,
    ];

    pub fn tables(self) -> &'static [TableTag] {
        match self {
            Step::Warehouses => &[TableTag::Warehouse],
            Step::Districts => &[TableTag::District],
            Step::CustomersAndHistory => &[TableTag::Customer, TableTag::History],
            Step::Items => &[TableTag::Item],
            Step::Stock => &[TableTag::Stock],
            Step::Orders => &ORDER_FAMILY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Warehouses => "warehouse",
            Step::Districts => "districts",
            Step::CustomersAndHistory => "customers and their history",
            Step::Items => "items",
            Step::Stock => "stocks",
            Step::Orders => "orders",
        }
    }

    fn run<S: RowSink>(self, generator: &mut Generator, sink: &mut S) -> anyhow::Result<()> {
        match self {
            Step::Warehouses => generator.generate_warehouses(sink),
            Step::Districts => generator.generate_districts(sink),
            Step::CustomersAndHistory => generator.generate_customers_and_history(sink),
            Step::Items => generator.generate_items(sink),
            Step::Stock => generator.generate_stock(sink),
            Step::Orders => generator.generate_orders(sink),
        }
    }
}

/// Notification sent to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    StepStarted(Step),
    Rows { table: TableTag, rows: u64 },
    StepFinished(Step),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub warehouse_count: u32,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub columns: ColumnMode,
    pub tables: TableSet,
    pub cardinalities: Cardinalities,
}

impl PipelineConfig {
    /// Reference run: seed 42, key and tag columns, district/customer/item/stock.
    pub fn new(warehouse_count: u32, output_dir: PathBuf) -> Self {
        Self {
            warehouse_count,
            output_dir,
            seed: DEFAULT_SEED,
            columns: ColumnMode::Keys,
            tables: TableSet::reference(),
            cardinalities: Cardinalities::default(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TableStats {
    pub table: String,
    pub tag: u8,
    pub rows: u64,
    pub file: PathBuf,
}

#[derive(Debug, Default, Serialize)]
pub struct GenerationStats {
    pub tables: Vec<TableStats>,
    /// Files opened by the run, in table-tag order
    pub files: Vec<PathBuf>,
    pub rows_total: u64,
}

impl GenerationStats {
    pub fn rows(&self, table: TableTag) -> Option<u64> {
        self.tables
            .iter()
            .find(|t| t.tag == table.as_u8())
            .map(|t| t.rows)
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    progress_fn: Option<Box<dyn Fn(ProgressEvent)>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            progress_fn: None,
        }
    }

    pub fn with_progress<F: Fn(ProgressEvent) + 'static>(mut self, f: F) -> Self {
        self.progress_fn = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Steps that will run for the configured table set, in order.
    pub fn planned_steps(&self) -> Vec<Step> {
        Step::ALL
            .into_iter()
            .filter(|step| self.config.tables.contains_any(step.tables()))
            .collect()
    }

    pub fn run(&self) -> anyhow::Result<GenerationStats> {
        let config = &self.config;
        if config.tables.contains_any(&ORDER_FAMILY) {
            config.cardinalities.validate()?;
        }
        self.check_key_ranges()?;

        let mut generator = Generator::new(config.warehouse_count, config.seed)
            .with_cardinalities(config.cardinalities)
            .with_tables(config.tables);
        let mut pool = WriterPool::new(config.output_dir.clone(), config.columns);

        {
            let mut sink = ProgressSink {
                inner: &mut pool,
                counts: [0; TableTag::ALL.len()],
                progress_fn: self.progress_fn.as_deref(),
            };

            for step in self.planned_steps() {
                sink.notify(ProgressEvent::StepStarted(step));
                step.run(&mut generator, &mut sink)
                    .with_context(|| format!("failed to generate {}", step.label()))?;
                sink.notify(ProgressEvent::StepFinished(step));
            }
        }

        pool.close_all()?;

        let mut stats = GenerationStats {
            files: pool.files(),
            ..Default::default()
        };
        for table in config.tables.iter() {
            let rows = pool.rows_written(table);
            stats.rows_total += rows;
            stats.tables.push(TableStats {
                table: table.name().to_string(),
                tag: table.as_u8(),
                rows,
                file: pool.file_path(table),
            });
        }

        Ok(stats)
    }

    /// Encode the largest identifiers of every enabled table before any file
    /// is opened, so an oversized warehouse count fails without partial output.
    fn check_key_ranges(&self) -> anyhow::Result<()> {
        let w = self.config.warehouse_count as u64;
        let c = &self.config.cardinalities;
        let d = c.districts_per_warehouse as u64;
        let customers = c.customers_per_district as u64;
        let orders = c.orders_per_district as u64;
        let items = c.items as u64;
        let lines = c.max_order_lines as u64;

        for table in self.config.tables.iter() {
            let fields: Vec<u64> = match table {
                TableTag::Warehouse => vec![w],
                TableTag::District => vec![w, d],
                TableTag::Customer => vec![w, d, customers],
                TableTag::NewOrder | TableTag::Order => vec![w, d, orders],
                TableTag::OrderLine => vec![w, d, orders, lines],
                TableTag::Item => vec![items],
                TableTag::Stock => vec![w, items],
                TableTag::History => vec![w, w.saturating_mul(d).saturating_mul(customers)],
                TableTag::OrderStatus => vec![w, d, customers, orders],
            };
            key::encode(table, &fields).with_context(|| {
                format!(
                    "{} warehouse(s) cannot be encoded in {} keys",
                    self.config.warehouse_count,
                    table.name()
                )
            })?;
        }

        Ok(())
    }
}

/// Counts rows per table on their way to the writers.
struct ProgressSink<'a, S: RowSink> {
    inner: &'a mut S,
    counts: [u64; TableTag::ALL.len()],
    progress_fn: Option<&'a dyn Fn(ProgressEvent)>,
}

impl<S: RowSink> ProgressSink<'_, S> {
    fn notify(&self, event: ProgressEvent) {
        if let Some(f) = self.progress_fn {
            f(event);
        }
    }
}

impl<S: RowSink> RowSink for ProgressSink<'_, S> {
    fn open_table(&mut self, table: TableTag) -> anyhow::Result<()> {
        self.inner.open_table(table)
    }

    fn write_row(&mut self, row: &Row) -> anyhow::Result<()> {
        self.inner.write_row(row)?;
        let count = &mut self.counts[row.tag.as_u8() as usize];
        *count += 1;
        let rows = *count;
        if rows % PROGRESS_INTERVAL == 0 {
            self.notify(ProgressEvent::Rows {
                table: row.tag,
                rows,
            });
        }
        Ok(())
    }
}
