//! Fixed benchmark cardinalities.
//!
//! The defaults are the TPC-C constants. Tests shrink them to keep fixtures
//! small; the generators never hard-code any of these numbers.

use serde::{Deserialize, Serialize};

pub const DISTRICTS_PER_WAREHOUSE: u32 = 10;
pub const CUSTOMERS_PER_DISTRICT: u32 = 3000;
pub const ITEM_COUNT: u32 = 100_000;
pub const ORDERS_PER_DISTRICT: u32 = 3000;
pub const MIN_ORDER_LINES: u32 = 5;
pub const MAX_ORDER_LINES: u32 = 15;
/// Orders with an id above this are still undelivered (new orders).
pub const NEW_ORDER_THRESHOLD: u32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cardinalities {
    pub districts_per_warehouse: u32,
    pub customers_per_district: u32,
    pub items: u32,
    pub orders_per_district: u32,
    pub min_order_lines: u32,
    pub max_order_lines: u32,
    pub new_order_threshold: u32,
}

impl Default for Cardinalities {
    fn default() -> Self {
        Self {
            districts_per_warehouse: DISTRICTS_PER_WAREHOUSE,
            customers_per_district: CUSTOMERS_PER_DISTRICT,
            items: ITEM_COUNT,
            orders_per_district: ORDERS_PER_DISTRICT,
            min_order_lines: MIN_ORDER_LINES,
            max_order_lines: MAX_ORDER_LINES,
            new_order_threshold: NEW_ORDER_THRESHOLD,
        }
    }
}

impl Cardinalities {
    /// First order id handed out after the generated orders.
    pub fn next_order_id(&self) -> u32 {
        self.orders_per_district.saturating_add(1)
    }

    /// New orders per district.
    pub fn new_orders_per_district(&self) -> u32 {
        self.orders_per_district
            .saturating_sub(self.new_order_threshold)
    }

    /// Checks the counts the order generator relies on.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.items == 0 {
            anyhow::bail!("item count must be at least 1: order lines draw an item id");
        }
        if self.orders_per_district != self.customers_per_district {
            anyhow::bail!(
                "orders per district ({}) must equal customers per district ({}): each customer owns exactly one order",
                self.orders_per_district,
                self.customers_per_district
            );
        }
        if self.min_order_lines > self.max_order_lines {
            anyhow::bail!(
                "min order lines ({}) exceeds max order lines ({})",
                self.min_order_lines,
                self.max_order_lines
            );
        }
        if self.new_order_threshold > self.orders_per_district {
            anyhow::bail!(
                "new order threshold ({}) exceeds orders per district ({})",
                self.new_order_threshold,
                self.orders_per_district
            );
        }
        Ok(())
    }
}
