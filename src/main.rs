//! seqhighlight - Genome Sequence Highlighter
//!
//! Browses a genome and colors every region resembling one of a set of
//! short query sequences.
//!
//! ## Usage
//!
//! ```bash
//! seqhighlight genome.fa -q GATTACA -q TTAGGG
//! seqhighlight genome.fa --query-file primers.fa -s 90
//! seqhighlight genome.fa -q GATTACA --scale 10 -o frame.ppm   # batch mode
//! ```
//!
//! ## Navigation
//!
//! - `j/k`: Scroll one row
//! - `+/-`: Zoom out/in
//! - `Tab`: Switch view
//! - `:q`: Quit
//! - `?`: Help

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use seqhighlight::config::{Config, HighlightConfig, ViewConfig, MAX_SCALE};
use seqhighlight::controller::run_app;
use seqhighlight::fasta::parse_fasta_file;
use seqhighlight::highlight::query::load_query_file;
use seqhighlight::highlight::HighlightDisplay;
use seqhighlight::logging;
use seqhighlight::model::{AppState, Genome};
use seqhighlight::render::write_ppm;
use seqhighlight::view::ViewParams;

/// Runs CLI mode: compute one highlight frame and write it as an image.
fn run_cli_mode(genome: &Genome, config: &Config, output: &str) -> Result<()> {
    let params = ViewParams::from_config(&config.view);
    let display = HighlightDisplay::new(&config.highlight);
    let window = params.window(0);
    let pixels = display.compute(genome.as_bytes(), window);
    let row_len = params.pixels_per_row();

    info!(
        "Computed {} pixels from position {} at {} bp/pixel",
        pixels.len(),
        window.start,
        window.scale
    );

    // Write output
    if output == "-" {
        // Write to stdout
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_ppm(&mut handle, &pixels, row_len)?;
    } else {
        // Write to file
        let file = File::create(output).with_context(|| format!("Cannot create {}", output))?;
        let mut writer = BufWriter::new(file);
        write_ppm(&mut writer, &pixels, row_len)?;
        writer.flush()?;
        eprintln!(
            "Wrote {}x{} image to {}",
            row_len,
            pixels.len().div_ceil(row_len),
            output
        );
    }

    Ok(())
}

/// seqhighlight - color a genome by similarity to short query sequences
///
/// When run without -o/--output, opens an interactive TUI viewer.
/// With -o/--output, runs in CLI mode and writes a PPM image to file (or stdout with "-").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Genome to browse (FASTA; multiple records are concatenated)
    file: PathBuf,

    /// Query sequence to highlight (repeatable)
    #[arg(short = 'q', long = "query")]
    queries: Vec<String>,

    /// File with one query per line (lines starting with '>' are skipped)
    #[arg(long = "query-file")]
    query_file: Option<PathBuf>,

    /// Minimum similarity in percent
    #[arg(short = 's', long = "similarity", default_value = "80",
          value_parser = clap::value_parser!(u8).range(20..=100))]
    similarity: u8,

    /// Do not search the reverse complement of the queries
    #[arg(long = "no-reverse")]
    no_reverse: bool,

    /// First displayed position (1-based)
    #[arg(long = "start", default_value = "1")]
    start: usize,

    /// Nucleotides per pixel
    #[arg(long = "scale", default_value = "1")]
    scale: usize,

    /// Nucleotides per display row
    #[arg(long = "width", default_value = "128")]
    width: usize,

    /// Number of displayed nucleotides
    #[arg(long = "size", default_value = "10000")]
    size: usize,

    /// Output image (enables CLI mode). Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,
}

impl Args {
    /// Builds the validated configuration, reading the query file if any.
    ///
    /// Queries from `--query-file` replace those given with `-q`.
    fn to_config(&self) -> Result<Config> {
        if self.scale > MAX_SCALE {
            anyhow::bail!("Scale must be 1-{} (got {})", MAX_SCALE, self.scale);
        }

        let mut config = Config {
            highlight: HighlightConfig {
                similarity: self.similarity,
                reverse_complement: !self.no_reverse,
                queries: self.queries.clone(),
            },
            view: ViewConfig {
                width: self.width,
                scale: self.scale,
                start: self.start,
                size: self.size,
                ..ViewConfig::default()
            },
        };
        if let Some(path) = &self.query_file {
            if !self.queries.is_empty() {
                warn!("Queries from {} replace the -q queries", path.display());
            }
            config.highlight.import_queries(load_query_file(path)?);
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging before anything else can log
    if args.output.is_some() {
        logging::init_stderr();
    } else {
        let log_path = logging::init_file()?;
        info!("Logging to {}", log_path.display());
    }

    let config = args.to_config()?;

    let genome = parse_fasta_file(&args.file)
        .with_context(|| format!("Cannot load genome from {}", args.file.display()))?;
    info!(
        "Loaded {} ({} bp, {} records)",
        genome.id,
        genome.len(),
        genome.record_count
    );

    // CLI mode: output to file/stdout
    if let Some(output) = &args.output {
        run_cli_mode(&genome, &config, output)?;
    } else {
        let file_name = args
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.file.display().to_string());
        run_app(AppState::new(genome, file_name, &config))?;
    }

    Ok(())
}
