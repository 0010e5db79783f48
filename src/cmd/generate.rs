use super::Cli;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;
use tpcc_gen::combiner::{CombineStats, Combiner};
use tpcc_gen::config::GenerateYamlConfig;
use tpcc_gen::generator::TableSet;
use tpcc_gen::key::TableTag;
use tpcc_gen::pipeline::{Pipeline, PipelineConfig, ProgressEvent, TableStats};
use tpcc_gen::writer::ColumnMode;

/// JSON output for a generation run
#[derive(Serialize)]
struct GenerateJsonOutput {
    warehouse_count: u32,
    output_dir: String,
    seed: u64,
    columns: String,
    statistics: GenerateStatistics,
    tables: Vec<TableStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    combined: Option<CombineStats>,
}

#[derive(Serialize)]
struct GenerateStatistics {
    rows_total: u64,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows_per_sec: Option<f64>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let yaml = match cli.config {
        Some(ref path) => GenerateYamlConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GenerateYamlConfig::default(),
    };

    let columns: ColumnMode = match cli.columns {
        Some(ref c) => c.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => yaml.columns,
    };

    let mut tables = if cli.all_tables {
        TableSet::all()
    } else if let Some(ref list) = cli.tables {
        list.parse::<TableSet>().map_err(|e| anyhow::anyhow!(e))?
    } else {
        yaml.table_set()?
    };
    if cli.with_history {
        tables.insert(TableTag::History);
    }

    let output = cli.output_path.clone();
    fs::create_dir_all(&output)
        .with_context(|| format!("cannot create output directory {}", output.display()))?;

    let config = PipelineConfig {
        warehouse_count: cli.warehouse_count,
        output_dir: output.clone(),
        seed: cli.seed.unwrap_or(yaml.seed),
        columns,
        tables,
        cardinalities: yaml.cardinalities,
    };
    let seed = config.seed;

    if !cli.json {
        println!(
            "Generating TPC-C data for {} warehouse{}, hold on ..",
            cli.warehouse_count,
            if cli.warehouse_count != 1 { "s" } else { "" }
        );
        println!("Output directory: {}", output.display());
        println!(
            "Tables: {}",
            tables.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
        );
        println!("Seed: {}, columns: {}", seed, columns);
        println!();
    }

    let pb = if cli.progress && !cli.json {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let pb_clone = pb.clone();
    let quiet = cli.json;
    let pipeline = Pipeline::new(config).with_progress(move |event| match event {
        ProgressEvent::StepStarted(step) => {
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Generating {} ..", step.label()));
            } else if !quiet {
                print!("Generating {} .. ", step.label());
                let _ = io::stdout().flush();
            }
        }
        ProgressEvent::Rows { table, rows } => {
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("{}: {} rows", table.name(), rows));
            }
        }
        ProgressEvent::StepFinished(step) => {
            if let Some(ref pb) = pb_clone {
                pb.println(format!("Generating {} .. ok !", step.label()));
            } else if !quiet {
                println!("ok !");
            }
        }
    });

    let start_time = Instant::now();
    let stats = pipeline.run()?;
    let elapsed = start_time.elapsed();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let combined = if cli.no_combine || !yaml.combine.enabled {
        None
    } else {
        let name = cli
            .combined_name
            .clone()
            .unwrap_or_else(|| yaml.combine.output_name.clone());
        let combiner = Combiner::new(output.clone())
            .with_output_name(name)
            .with_sorted(yaml.combine.sorted && !cli.unsorted);
        Some(combiner.combine()?)
    };

    let rows_per_sec = if elapsed.as_secs_f64() > 0.0 {
        Some(stats.rows_total as f64 / elapsed.as_secs_f64())
    } else {
        None
    };

    if cli.json {
        let output_json = GenerateJsonOutput {
            warehouse_count: cli.warehouse_count,
            output_dir: output.display().to_string(),
            seed,
            columns: columns.to_string(),
            statistics: GenerateStatistics {
                rows_total: stats.rows_total,
                elapsed_secs: elapsed.as_secs_f64(),
                rows_per_sec,
            },
            tables: stats.tables,
            combined,
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
        return Ok(());
    }

    println!("\n.. data generation completed successfully :)");
    println!("\nStatistics:");
    for table in &stats.tables {
        println!("  {:<14} {:>12} rows", table.table, table.rows);
    }
    println!("  Rows total: {}", stats.rows_total);
    println!("  Files written: {}", stats.files.len());
    println!("  Elapsed time: {:.3?}", elapsed);
    if let Some(throughput) = rows_per_sec {
        println!("  Throughput: {:.0} rows/s", throughput);
    }

    if let Some(combined) = combined {
        println!(
            "\nCombined {} files into {} ({:.2} MB)",
            combined.files_combined,
            combined.output_file.display(),
            combined.bytes_written as f64 / (1024.0 * 1024.0)
        );
        if !combined.skipped.is_empty() {
            println!("  Skipped {} unreadable file(s)", combined.skipped.len());
        }
    }

    Ok(())
}
