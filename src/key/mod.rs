//! Composite key encoding.
//!
//! Every generated row is identified by a single 64-bit key. The most
//! significant nibble holds the [`TableTag`]; the remaining 60 bits are
//! filled with the table's identifier fields, from most to least
//! significant, using the widths listed in each table's layout:
//!
//! ```text
//! | tag (4) | w_id (14) | d_id (4) | o_id (24) | ol_number (4) | unused (10) |
//!  63     60 59       46 45      42 41       18 17            14 13         0
//! ```
//!
//! Values wider than their field are rejected with [`KeyError::FieldOutOfRange`]
//! instead of being truncated, so two distinct identifier tuples can never
//! share a key.

use std::fmt;

/// Number of bits reserved for the table tag.
pub const TAG_BITS: u32 = 4;

/// Number of bits available to identifier fields.
pub const PAYLOAD_BITS: u32 = 64 - TAG_BITS;

const TAG_MASK: u64 = (1 << TAG_BITS) - 1;

/// One identifier field inside a composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: u32,
}

impl Field {
    const fn new(name: &'static str, width: u32) -> Self {
        Self { name, width }
    }

    /// Largest value that fits in this field.
    pub const fn max_value(&self) -> u64 {
        (1u64 << self.width) - 1
    }
}

const W_ID: Field = Field::new("w_id", 14);
const D_ID: Field = Field::new("d_id", 4);
const C_ID: Field = Field::new("c_id", 12);
const O_ID: Field = Field::new("o_id", 24);
const OL_NUMBER: Field = Field::new("ol_number", 4);
const I_ID: Field = Field::new("i_id", 17);
const CLIENT_ID: Field = Field::new("client_id", 14);
const H_ID: Field = Field::new("h_id", 40);

/// Table identifier stored in the top nibble of every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TableTag {
    Warehouse = 0,
    District = 1,
    Customer = 2,
    NewOrder = 3,
    Order = 4,
    Item = 5,
    Stock = 6,
    OrderLine = 7,
    History = 8,
    OrderStatus = 9,
}

impl TableTag {
    pub const ALL: [TableTag; 10] = [
        TableTag::Warehouse,
        TableTag::District,
        TableTag::Customer,
        TableTag::NewOrder,
        TableTag::Order,
        TableTag::Item,
        TableTag::Stock,
        TableTag::OrderLine,
        TableTag::History,
        TableTag::OrderStatus,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Table name, also used as the output file stem.
    pub fn name(self) -> &'static str {
        match self {
            TableTag::Warehouse => "warehouse",
            TableTag::District => "district",
            TableTag::Customer => "customer",
            TableTag::NewOrder => "new_order",
            TableTag::Order => "order",
            TableTag::Item => "item",
            TableTag::Stock => "stock",
            TableTag::OrderLine => "order_line",
            TableTag::History => "history",
            TableTag::OrderStatus => "order_status",
        }
    }

    /// Identifier fields of this table, most significant first.
    pub fn fields(self) -> &'static [Field] {
        match self {
            TableTag::Warehouse => &[W_ID],
            TableTag::District => &[W_ID, D_ID],
            TableTag::Customer => &[W_ID, D_ID, C_ID],
            TableTag::NewOrder | TableTag::Order => &[W_ID, D_ID, O_ID],
            TableTag::OrderLine => &[W_ID, D_ID, O_ID, OL_NUMBER],
            TableTag::Item => &[I_ID],
            TableTag::Stock => &[W_ID, I_ID],
            TableTag::History => &[CLIENT_ID, H_ID],
            TableTag::OrderStatus => &[W_ID, D_ID, C_ID, O_ID],
        }
    }

    /// Bit offset of each field's least significant bit, parallel to [`fields`](Self::fields).
    pub fn shifts(self) -> impl Iterator<Item = u32> {
        let mut shift = PAYLOAD_BITS;
        self.fields().iter().map(move |field| {
            shift -= field.width;
            shift
        })
    }
}

impl fmt::Display for TableTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableTag::Warehouse => write!(f, "WAREHOUSE"),
            TableTag::District => write!(f, "DISTRICT"),
            TableTag::Customer => write!(f, "CUSTOMER"),
            TableTag::NewOrder => write!(f, "NEWORDER"),
            TableTag::Order => write!(f, "ORDER"),
            TableTag::Item => write!(f, "ITEM"),
            TableTag::Stock => write!(f, "STOCK"),
            TableTag::OrderLine => write!(f, "ORDERLINE"),
            TableTag::History => write!(f, "HISTORY"),
            TableTag::OrderStatus => write!(f, "ORDERSTATUS"),
        }
    }
}

impl std::str::FromStr for TableTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        TableTag::ALL
            .into_iter()
            .find(|tag| tag.name() == normalized || tag.name().replace('_', "") == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown table: {}. Valid tables: {}",
                    s,
                    TableTag::ALL.map(|t| t.name()).join(", ")
                )
            })
    }
}

/// Errors raised while encoding or decoding a composite key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// An identifier does not fit in its bit field.
    FieldOutOfRange {
        table: TableTag,
        field: &'static str,
        value: u64,
        width: u32,
    },
    /// Wrong number of identifiers for the table's layout.
    ArityMismatch {
        table: TableTag,
        expected: usize,
        actual: usize,
    },
    /// The top nibble does not name a known table.
    UnknownTag(u8),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::FieldOutOfRange {
                table,
                field,
                value,
                width,
            } => write!(
                f,
                "{} key field {} = {} does not fit in {} bits (max {})",
                table,
                field,
                value,
                width,
                (1u64 << width) - 1
            ),
            KeyError::ArityMismatch {
                table,
                expected,
                actual,
            } => write!(
                f,
                "{} key takes {} fields, got {}",
                table, expected, actual
            ),
            KeyError::UnknownTag(tag) => write!(f, "unknown table tag {}", tag),
        }
    }
}

impl std::error::Error for KeyError {}

/// Pack a table tag and its identifier fields into one key.
pub fn encode(tag: TableTag, values: &[u64]) -> Result<i64, KeyError> {
    let fields = tag.fields();
    if fields.len() != values.len() {
        return Err(KeyError::ArityMismatch {
            table: tag,
            expected: fields.len(),
            actual: values.len(),
        });
    }

    let mut key = (tag.as_u8() as u64) << PAYLOAD_BITS;
    for ((field, shift), &value) in fields.iter().zip(tag.shifts()).zip(values) {
        if value > field.max_value() {
            return Err(KeyError::FieldOutOfRange {
                table: tag,
                field: field.name,
                value,
                width: field.width,
            });
        }
        key |= value << shift;
    }

    Ok(key as i64)
}

/// Read the table tag out of a key's top nibble.
pub fn table_tag(key: i64) -> Result<TableTag, KeyError> {
    let raw = ((key as u64) >> PAYLOAD_BITS) & TAG_MASK;
    TableTag::from_u8(raw as u8).ok_or(KeyError::UnknownTag(raw as u8))
}

/// Split a key back into its tag and identifier fields.
pub fn decode(key: i64) -> Result<(TableTag, Vec<u64>), KeyError> {
    let tag = table_tag(key)?;
    let raw = key as u64;
    let values = tag
        .fields()
        .iter()
        .zip(tag.shifts())
        .map(|(field, shift)| (raw >> shift) & field.max_value())
        .collect();
    Ok((tag, values))
}

pub fn encode_warehouse(w_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::Warehouse, &[w_id as u64])
}

pub fn encode_district(w_id: u32, d_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::District, &[w_id as u64, d_id as u64])
}

pub fn encode_customer(w_id: u32, d_id: u32, c_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::Customer, &[w_id as u64, d_id as u64, c_id as u64])
}

pub fn encode_new_order(w_id: u32, d_id: u32, o_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::NewOrder, &[w_id as u64, d_id as u64, o_id as u64])
}

pub fn encode_order(w_id: u32, d_id: u32, o_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::Order, &[w_id as u64, d_id as u64, o_id as u64])
}

pub fn encode_order_line(
    w_id: u32,
    d_id: u32,
    o_id: u32,
    ol_number: u32,
) -> Result<i64, KeyError> {
    encode(
        TableTag::OrderLine,
        &[w_id as u64, d_id as u64, o_id as u64, ol_number as u64],
    )
}

pub fn encode_item(i_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::Item, &[i_id as u64])
}

pub fn encode_stock(w_id: u32, i_id: u32) -> Result<i64, KeyError> {
    encode(TableTag::Stock, &[w_id as u64, i_id as u64])
}

pub fn encode_history(client_id: u32, h_id: u64) -> Result<i64, KeyError> {
    encode(TableTag::History, &[client_id as u64, h_id])
}

pub fn encode_order_status(w_id: u32, d_id: u32, c_id: u32, o_id: u32) -> Result<i64, KeyError> {
    encode(
        TableTag::OrderStatus,
        &[w_id as u64, d_id as u64, c_id as u64, o_id as u64],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_fit_payload() {
        for tag in TableTag::ALL {
            let used: u32 = tag.fields().iter().map(|f| f.width).sum();
            assert!(used <= PAYLOAD_BITS, "{} uses {} bits", tag, used);
        }
    }

    #[test]
    fn test_encode_district_bits() {
        let key = encode_district(1, 1).unwrap();
        assert_eq!(key, (1i64 << 60) | (1i64 << 46) | (1i64 << 42));
        assert_eq!(key, 1_152_996_271_397_535_744);
    }

    #[test]
    fn test_encode_item_bits() {
        assert_eq!(encode_item(1).unwrap(), 5_764_616_319_127_257_088);
    }

    #[test]
    fn test_high_tags_are_negative() {
        let key = encode_order_status(1, 0, 0, 0).unwrap();
        assert!(key < 0);
        assert_eq!(key, -8_070_380_163_503_751_168);
        assert_eq!(table_tag(key).unwrap(), TableTag::OrderStatus);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = encode(TableTag::Stock, &[1]).unwrap_err();
        assert_eq!(
            err,
            KeyError::ArityMismatch {
                table: TableTag::Stock,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_unknown_tag() {
        let key = (15u64 << PAYLOAD_BITS) as i64;
        assert_eq!(table_tag(key).unwrap_err(), KeyError::UnknownTag(15));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = encode_district(1, 20).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DISTRICT"));
        assert!(msg.contains("d_id"));
        assert!(msg.contains("max 15"));
    }
}
