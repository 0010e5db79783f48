mod generate;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tpcc-gen")]
#[command(version)]
#[command(
    about = "Generate a deterministic TPC-C dataset as one CSV file per table",
    long_about = None
)]
pub struct Cli {
    /// Number of warehouses to generate (0 to 4294967295)
    #[arg(value_parser = parse_warehouse_count, allow_negative_numbers = true)]
    pub warehouse_count: u32,

    /// Directory the per-table CSV files are written to
    pub output_path: PathBuf,

    /// Random seed for the dataset (default: 42)
    #[arg(long)]
    pub seed: Option<u64>,

    /// YAML config file for table switches, seed and cardinalities
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Columns per row: keys (key and table tag) or full (all computed attributes)
    #[arg(long)]
    pub columns: Option<String>,

    /// Exact set of tables to write (comma-separated, e.g. district,item,order_line)
    #[arg(short, long, conflicts_with = "all_tables")]
    pub tables: Option<String>,

    /// Write every table, including warehouse, history and the order tables
    #[arg(long)]
    pub all_tables: bool,

    /// Also write one history row per customer
    #[arg(long)]
    pub with_history: bool,

    /// Do not concatenate the table files into the combined file
    #[arg(long)]
    pub no_combine: bool,

    /// File name of the combined output (default: tpcc_table.csv)
    #[arg(long)]
    pub combined_name: Option<String>,

    /// Concatenate in directory order instead of sorting by file name
    #[arg(long)]
    pub unsorted: bool,

    /// Show progress during generation
    #[arg(short, long)]
    pub progress: bool,

    /// Output a JSON summary instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

fn parse_warehouse_count(s: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("can not parse '{}' as a 32 bit unsigned integer", s))
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    generate::run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_warehouse_count() {
        assert_eq!(parse_warehouse_count("0"), Ok(0));
        assert_eq!(parse_warehouse_count("4294967295"), Ok(u32::MAX));
        assert!(parse_warehouse_count("4294967296").is_err());
        assert!(parse_warehouse_count("-1").is_err());
        assert!(parse_warehouse_count("12abc").is_err());
        assert!(parse_warehouse_count("").is_err());
    }

    #[test]
    fn test_cli_positional_args() {
        let cli = Cli::try_parse_from(["tpcc-gen", "2", "out"]).unwrap();
        assert_eq!(cli.warehouse_count, 2);
        assert_eq!(cli.output_path, PathBuf::from("out"));
        assert!(!cli.all_tables);
    }

    #[test]
    fn test_cli_negative_count_reaches_parser() {
        let err = match Cli::try_parse_from(["tpcc-gen", "-1", "out"]) {
            Ok(_) => panic!("negative warehouse count accepted"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("can not parse '-1'"));
    }

    #[test]
    fn test_cli_rejects_missing_output() {
        assert!(Cli::try_parse_from(["tpcc-gen", "2"]).is_err());
    }

    #[test]
    fn test_cli_tables_conflict_with_all_tables() {
        assert!(Cli::try_parse_from(["tpcc-gen", "1", "out", "--all-tables", "-t", "item"]).is_err());
    }
}
