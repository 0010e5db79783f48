//! YAML configuration for a generation run.
//!
//! Every field is optional; an empty file reproduces the reference run.
//!
//! ```yaml
//! seed: 42
//! columns: full
//! tables:
//!   warehouse: true
//!   order: true
//!   order_line: true
//! cardinalities:
//!   items: 1000
//! combine:
//!   output_name: tpcc_table.csv
//! ```

use crate::combiner::COMBINED_FILE_NAME;
use crate::generator::{Cardinalities, TableSet};
use crate::key::TableTag;
use crate::random::DEFAULT_SEED;
use crate::writer::ColumnMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Combine step settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    /// Concatenate the table files after generation
    pub enabled: bool,
    /// Name of the combined file inside the output directory
    pub output_name: String,
    /// Concatenate in file-name order rather than directory order
    pub sorted: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_name: COMBINED_FILE_NAME.to_string(),
            sorted: true,
        }
    }
}

/// Complete YAML configuration for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateYamlConfig {
    pub seed: u64,
    pub columns: ColumnMode,
    /// Per-table switches applied on top of the reference table set
    pub tables: BTreeMap<String, bool>,
    pub cardinalities: Cardinalities,
    pub combine: CombineConfig,
}

impl Default for GenerateYamlConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            columns: ColumnMode::default(),
            tables: BTreeMap::new(),
            cardinalities: Cardinalities::default(),
            combine: CombineConfig::default(),
        }
    }
}

impl GenerateYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GenerateYamlConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Reference table set with the file's switches applied
    pub fn table_set(&self) -> anyhow::Result<TableSet> {
        let mut set = TableSet::reference();
        for (name, &enabled) in &self.tables {
            let table: TableTag = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            if enabled {
                set.insert(table);
            } else {
                set.remove(table);
            }
        }
        Ok(set)
    }
}
