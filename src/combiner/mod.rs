//! Combiner for concatenating the per-table files into one artifact.

use anyhow::Context;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the combined file written into the output directory.
pub const COMBINED_FILE_NAME: &str = "tpcc_table.csv";

/// Statistics from combine operation
#[derive(Debug, Default, Serialize)]
pub struct CombineStats {
    pub output_file: PathBuf,
    pub files_combined: usize,
    pub bytes_written: u64,
    pub file_names: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

/// An input that could not be read and was left out
#[derive(Debug, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub error: String,
}

/// Combiner configuration
pub struct CombinerConfig {
    pub output_name: String,
    pub sorted: bool,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            output_name: COMBINED_FILE_NAME.to_string(),
            sorted: true,
        }
    }
}

/// Concatenates every regular file of a directory into one file in the same directory
pub struct Combiner {
    input_dir: PathBuf,
    config: CombinerConfig,
}

impl Combiner {
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            config: CombinerConfig::default(),
        }
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = name.into();
        self
    }

    /// Sort inputs by file name instead of keeping directory order
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.config.sorted = sorted;
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.input_dir.join(&self.config.output_name)
    }

    /// Run the combine operation.
    ///
    /// Failing to create the combined file aborts; an input that cannot be
    /// opened or read is reported on stderr and skipped. A read error in the
    /// middle of an input leaves the bytes copied before it in the combined
    /// file; they are not counted in `bytes_written`.
    pub fn combine(&self) -> anyhow::Result<CombineStats> {
        let mut files = self.discover_files()?;
        if self.config.sorted {
            files.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let output_path = self.output_path();
        let file = File::create(&output_path).with_context(|| {
            format!("cannot open combined output file {}", output_path.display())
        })?;
        let mut writer = BufWriter::with_capacity(256 * 1024, file);

        let mut stats = CombineStats {
            output_file: output_path.clone(),
            ..Default::default()
        };

        for (name, path) in &files {
            match append_file(path, &mut writer) {
                Ok(bytes) => {
                    stats.bytes_written += bytes;
                    stats.files_combined += 1;
                    stats.file_names.push(name.clone());
                }
                Err(e) => {
                    eprintln!("Warning: failed to read {}: {}", path.display(), e);
                    stats.skipped.push(SkippedFile {
                        file: name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        writer
            .flush()
            .with_context(|| format!("failed to write {}", output_path.display()))?;

        Ok(stats)
    }

    /// Regular files and links to non-directories in the input directory,
    /// excluding the combined file itself. A broken link is kept so that it
    /// is reported as unreadable instead of silently disappearing.
    fn discover_files(&self) -> anyhow::Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();

        let entries = fs::read_dir(&self.input_dir)
            .with_context(|| format!("cannot read directory {}", self.input_dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let is_link = entry.file_type()?.is_symlink();

            if path.is_file() || (is_link && !path.is_dir()) {
                let name = entry.file_name().to_string_lossy().to_string();
                if name != self.config.output_name {
                    files.push((name, path));
                }
            }
        }

        Ok(files)
    }
}

fn append_file<W: Write>(path: &Path, writer: &mut W) -> io::Result<u64> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(64 * 1024, file);
    io::copy(&mut reader, writer)
}
