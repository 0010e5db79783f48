//! Row generators for every table of the order-processing schema.
//!
//! Each `generate_*` method walks its part of the entity hierarchy and pushes
//! rows into a [`RowSink`]. All random decisions come from the generator's
//! single [`DeterministicRandom`], so the exact values depend on the order in
//! which the methods are called. [`crate::pipeline`] fixes that order.
//!
//! Values are drawn whether or not the table is enabled, so switching a table
//! on or off never shifts the values of the tables generated after it.

pub mod cardinality;
pub mod row;
pub mod tables;

pub use cardinality::Cardinalities;
pub use row::{MemorySink, Row, RowSink, Value};
pub use tables::TableSet;

use crate::key::{self, TableTag};
use crate::random::{last_name, DeterministicRandom};

const WAREHOUSE_YTD: f64 = 3_000_000.00;
const CUSTOMER_BALANCE: i64 = -1000;
const HISTORY_AMOUNT: f64 = 10.00;

/// Tables produced by the order generator.
pub const ORDER_FAMILY: [TableTag; 4] = [
    TableTag::Order,
    TableTag::OrderLine,
    TableTag::NewOrder,
    TableTag::OrderStatus,
];

/// Street, city, state and zip drawn for a warehouse.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street_1: String,
    pub street_2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn generate(rng: &mut DeterministicRandom) -> Self {
        Self {
            street_1: rng.next_alpha_string(10, 20),
            street_2: rng.next_alpha_string(10, 20),
            city: rng.next_alpha_string(10, 20),
            state: rng.next_alpha_string(2, 2),
            zip: rng.next_numeric_string(9, 9),
        }
    }
}

pub struct Generator {
    warehouse_count: u32,
    cardinalities: Cardinalities,
    tables: TableSet,
    rng: DeterministicRandom,
}

impl Generator {
    pub fn new(warehouse_count: u32, seed: u64) -> Self {
        Self {
            warehouse_count,
            cardinalities: Cardinalities::default(),
            tables: TableSet::all(),
            rng: DeterministicRandom::new(seed),
        }
    }

    pub fn with_cardinalities(mut self, cardinalities: Cardinalities) -> Self {
        self.cardinalities = cardinalities;
        self
    }

    pub fn with_tables(mut self, tables: TableSet) -> Self {
        self.tables = tables;
        self
    }

    pub fn warehouse_count(&self) -> u32 {
        self.warehouse_count
    }

    pub fn cardinalities(&self) -> &Cardinalities {
        &self.cardinalities
    }

    pub fn tables(&self) -> TableSet {
        self.tables
    }

    fn open<S: RowSink>(&self, sink: &mut S, tables: &[TableTag]) -> anyhow::Result<()> {
        for &table in tables {
            if self.tables.contains(table) {
                sink.open_table(table)?;
            }
        }
        Ok(())
    }

    fn emit<S: RowSink>(&self, sink: &mut S, row: Row) -> anyhow::Result<()> {
        if self.tables.contains(row.tag) {
            sink.write_row(&row)?;
        }
        Ok(())
    }

    pub fn generate_warehouses<S: RowSink>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        self.open(sink, &[TableTag::Warehouse])?;

        for w_id in 1..=self.warehouse_count {
            let name = self.rng.next_alpha_string(6, 10);
            let address = Address::generate(&mut self.rng);
            let tax = self.rng.next_uniform(10, 20) as f64 / 100.0;

            let key = key::encode_warehouse(w_id)?;
            let attributes = vec![
                Value::Text(name),
                Value::Text(address.street_1),
                Value::Text(address.street_2),
                Value::Text(address.city),
                Value::Text(address.state),
                Value::Text(address.zip),
                Value::Decimal(tax, 4),
                Value::Decimal(WAREHOUSE_YTD, 2),
            ];
            self.emit(sink, Row::new(key, TableTag::Warehouse, attributes))?;
        }

        Ok(())
    }

    pub fn generate_districts<S: RowSink>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        self.open(sink, &[TableTag::District])?;
        let next_o_id = self.cardinalities.next_order_id() as i64;

        for w_id in 1..=self.warehouse_count {
            for d_id in 1..=self.cardinalities.districts_per_warehouse {
                let key = key::encode_district(w_id, d_id)?;
                self.emit(
                    sink,
                    Row::new(key, TableTag::District, vec![Value::Int(next_o_id)]),
                )?;
            }
        }

        Ok(())
    }

    /// Customers, plus one history row per customer when `history` is enabled.
    pub fn generate_customers_and_history<S: RowSink>(
        &mut self,
        sink: &mut S,
    ) -> anyhow::Result<()> {
        self.open(sink, &[TableTag::Customer, TableTag::History])?;
        let with_history = self.tables.contains(TableTag::History);
        let mut h_id: u64 = 0;

        for w_id in 1..=self.warehouse_count {
            for d_id in 1..=self.cardinalities.districts_per_warehouse {
                for c_id in 1..=self.cardinalities.customers_per_district {
                    let key = key::encode_customer(w_id, d_id, c_id)?;
                    let attributes = vec![
                        Value::Text(last_name(c_id - 1)),
                        Value::Int(CUSTOMER_BALANCE),
                    ];
                    self.emit(sink, Row::new(key, TableTag::Customer, attributes))?;

                    if with_history {
                        h_id += 1;
                        let data = self.rng.next_alpha_string(12, 24);
                        let key = key::encode_history(w_id, h_id)?;
                        let attributes = vec![
                            Value::Int(c_id as i64),
                            Value::Int(d_id as i64),
                            Value::Int(w_id as i64),
                            Value::Decimal(HISTORY_AMOUNT, 2),
                            Value::Text(data),
                        ];
                        self.emit(sink, Row::new(key, TableTag::History, attributes))?;
                    }
                }
            }
        }

        Ok(())
    }

    pub fn generate_items<S: RowSink>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        self.open(sink, &[TableTag::Item])?;

        for i_id in 1..=self.cardinalities.items {
            let key = key::encode_item(i_id)?;
            // cents
            let price = self.rng.next_uniform(100, 10_000);
            self.emit(
                sink,
                Row::new(key, TableTag::Item, vec![Value::Int(price as i64)]),
            )?;
        }

        Ok(())
    }

    pub fn generate_stock<S: RowSink>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        self.open(sink, &[TableTag::Stock])?;

        for w_id in 1..=self.warehouse_count {
            for i_id in 1..=self.cardinalities.items {
                let key = key::encode_stock(w_id, i_id)?;
                let quantity = self.rng.next_uniform(10, 100);
                let attributes = vec![
                    Value::Int(quantity as i64),
                    Value::Int(0),
                    Value::Int(0),
                    Value::Int(0),
                ];
                self.emit(sink, Row::new(key, TableTag::Stock, attributes))?;
            }
        }

        Ok(())
    }

    /// Orders with their order lines, order-status rows and new-order rows.
    ///
    /// Per district, a permutation of the customer ids assigns each order to
    /// exactly one customer. Orders above the new-order threshold carry
    /// non-zero line amounts and get a new-order row.
    pub fn generate_orders<S: RowSink>(&mut self, sink: &mut S) -> anyhow::Result<()> {
        let c = self.cardinalities;
        c.validate()?;
        self.open(sink, &ORDER_FAMILY)?;
        let mut entry_sequence: i64 = 0;

        for w_id in 1..=self.warehouse_count {
            for d_id in 1..=c.districts_per_warehouse {
                let customer_ids = self.rng.next_permutation(1, c.customers_per_district + 1);

                for o_id in 1..=c.orders_per_district {
                    let o_key = key::encode_order(w_id, d_id, o_id)?;
                    let c_id = customer_ids[(o_id - 1) as usize];
                    let os_key = key::encode_order_status(w_id, d_id, c_id, o_id)?;
                    let carrier_id = self.rng.next_uniform(1, 10);
                    let line_count = self.rng.next_uniform(c.min_order_lines, c.max_order_lines);
                    entry_sequence += 1;
                    let undelivered = o_id > c.new_order_threshold;

                    let attributes = vec![
                        Value::Int(c_id as i64),
                        Value::Int(carrier_id as i64),
                        Value::Int(line_count as i64),
                        Value::Int(entry_sequence),
                        Value::Int(1),
                    ];
                    self.emit(sink, Row::new(o_key, TableTag::Order, attributes))?;
                    self.emit(sink, Row::new(os_key, TableTag::OrderStatus, Vec::new()))?;

                    for ol_number in 1..=line_count {
                        let ol_key = key::encode_order_line(w_id, d_id, o_id, ol_number)?;
                        let i_id = self.rng.next_uniform(1, c.items);
                        let amount = if undelivered {
                            self.rng.next_uniform(10, 10_000)
                        } else {
                            0
                        };
                        let attributes = vec![Value::Int(i_id as i64), Value::Int(amount as i64)];
                        self.emit(sink, Row::new(ol_key, TableTag::OrderLine, attributes))?;
                    }

                    if undelivered {
                        let no_key = key::encode_new_order(w_id, d_id, o_id)?;
                        self.emit(sink, Row::new(no_key, TableTag::NewOrder, Vec::new()))?;
                    }
                }
            }
        }

        Ok(())
    }
}
