//! Deterministic TPC-C style dataset generator.
//!
//! Rows are identified by 64-bit composite keys ([`key`]) and generated from
//! a single seeded stream ([`random`]) by the table generators
//! ([`generator`]). The [`pipeline`] writes one CSV file per table and the
//! [`combiner`] concatenates them into a single file.
//!
//! # Example
//!
//! ```rust,no_run
//! use tpcc_gen::pipeline::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new(1, "out".into());
//! let stats = Pipeline::new(config).run().unwrap();
//! println!("{} rows", stats.rows_total);
//! ```

pub mod combiner;
pub mod config;
pub mod generator;
pub mod key;
pub mod pipeline;
pub mod random;
pub mod writer;
