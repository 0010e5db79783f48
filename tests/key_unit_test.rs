//! Unit tests for the composite key encoding

use tpcc_gen::key::{self, KeyError, TableTag, PAYLOAD_BITS};

fn max_fields(tag: TableTag) -> Vec<u64> {
    tag.fields().iter().map(|f| f.max_value()).collect()
}

fn mask_of(tag: TableTag, index: usize) -> u64 {
    let shift = tag.shifts().nth(index).unwrap();
    tag.fields()[index].max_value() << shift
}

#[test]
fn test_tag_recoverable_for_all_tables() {
    for tag in TableTag::ALL {
        let zeros = vec![0; tag.fields().len()];
        let ones = vec![1; tag.fields().len()];
        for fields in [zeros, ones, max_fields(tag)] {
            let encoded = key::encode(tag, &fields).unwrap();
            assert_eq!(key::table_tag(encoded).unwrap(), tag);
            assert_eq!(((encoded as u64) >> PAYLOAD_BITS) as u8, tag.as_u8());
        }
    }
}

#[test]
fn test_decode_inverts_encode() {
    let encoded = key::encode_order_line(7, 3, 2999, 15).unwrap();
    let (tag, fields) = key::decode(encoded).unwrap();
    assert_eq!(tag, TableTag::OrderLine);
    assert_eq!(fields, vec![7, 3, 2999, 15]);

    let encoded = key::encode_history(16383, (1 << 40) - 1).unwrap();
    assert_eq!(
        key::decode(encoded).unwrap(),
        (TableTag::History, vec![16383, (1 << 40) - 1])
    );
}

#[test]
fn test_district_field_isolation() {
    let w_mask = mask_of(TableTag::District, 0);
    let d_mask = mask_of(TableTag::District, 1);

    let base = key::encode_district(5, 1).unwrap() as u64;
    for d_id in 2..=15 {
        let other = key::encode_district(5, d_id).unwrap() as u64;
        assert_eq!(base & w_mask, other & w_mask);
        assert_eq!((base ^ other) & !d_mask, 0);
    }
    for w_id in [1, 100, 16383] {
        let other = key::encode_district(w_id, 1).unwrap() as u64;
        assert_eq!(base & d_mask, other & d_mask);
        assert_eq!((base ^ other) & !w_mask, 0);
    }
}

#[test]
fn test_field_isolation_every_table() {
    for tag in TableTag::ALL {
        let fields = tag.fields();
        let base: Vec<u64> = fields.iter().map(|_| 1).collect();
        let base_key = key::encode(tag, &base).unwrap() as u64;

        for index in 0..fields.len() {
            let mut varied = base.clone();
            varied[index] = fields[index].max_value();
            let varied_key = key::encode(tag, &varied).unwrap() as u64;
            let changed = base_key ^ varied_key;
            assert_ne!(changed, 0, "{} field {}", tag, fields[index].name);
            assert_eq!(
                changed & !mask_of(tag, index),
                0,
                "{} field {} leaked into a sibling",
                tag,
                fields[index].name
            );
        }
    }
}

#[test]
fn test_district_out_of_range_rejected() {
    let err = key::encode_district(1, 20).unwrap_err();
    assert_eq!(
        err,
        KeyError::FieldOutOfRange {
            table: TableTag::District,
            field: "d_id",
            value: 20,
            width: 4,
        }
    );
    // 20 truncated to 4 bits would have collided with d_id = 4
    assert!(key::encode_district(1, 4).is_ok());
}

#[test]
fn test_warehouse_id_limit() {
    assert!(key::encode_stock(16383, 100_000).is_ok());
    assert!(matches!(
        key::encode_stock(16384, 1),
        Err(KeyError::FieldOutOfRange { field: "w_id", .. })
    ));
    assert!(matches!(
        key::encode_item(1 << 17),
        Err(KeyError::FieldOutOfRange { field: "i_id", .. })
    ));
}

#[test]
fn test_customer_and_order_widths() {
    assert!(key::encode_customer(1, 1, 4095).is_ok());
    assert!(key::encode_customer(1, 1, 4096).is_err());
    assert!(key::encode_order(1, 1, (1 << 24) - 1).is_ok());
    assert!(key::encode_new_order(1, 1, 1 << 24).is_err());
    assert!(key::encode_order_line(1, 1, 1, 16).is_err());
}

#[test]
fn test_new_order_and_order_differ_only_by_tag() {
    let order = key::encode_order(2, 3, 2500).unwrap() as u64;
    let new_order = key::encode_new_order(2, 3, 2500).unwrap() as u64;
    assert_eq!(order ^ new_order, (4u64 ^ 3u64) << PAYLOAD_BITS);
}

#[test]
fn test_table_names_parse() {
    for tag in TableTag::ALL {
        assert_eq!(tag.name().parse::<TableTag>().unwrap(), tag);
    }
    assert_eq!("NewOrder".parse::<TableTag>().unwrap(), TableTag::NewOrder);
    assert!("payment".parse::<TableTag>().is_err());
}
