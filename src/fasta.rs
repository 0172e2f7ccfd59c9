//! FASTA genome loader.
//!
//! Reads a FASTA file into a single `Genome`. Multi-record files are
//! concatenated in file order, so a genome split by chromosome can be
//! browsed end to end.
//!
//! ## FASTA Format
//!
//! ```text
//! >chr1 optional description
//! ACGTACGTACGT...
//! >chr2
//! TGCATGCATGCA...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::model::Genome;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Accumulates records line by line.
#[derive(Default)]
struct GenomeBuilder {
    first_id: Option<String>,
    records: usize,
    data: Vec<u8>,
    line_number: usize,
}

impl GenomeBuilder {
    fn push_line(&mut self, line: &str) -> FastaResult<()> {
        self.line_number += 1;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            return Ok(());
        }

        if let Some(header) = line.strip_prefix('>') {
            // Take everything before the first space as ID
            let id = header.split_whitespace().next().unwrap_or("");
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    self.line_number
                )));
            }
            if self.first_id.is_none() {
                self.first_id = Some(id.to_string());
            }
            self.records += 1;
        } else {
            if self.records == 0 {
                return Err(FastaError::SequenceWithoutHeader(self.line_number));
            }
            // Fast append: most FASTA lines don't have internal whitespace
            if line.bytes().all(|b| !b.is_ascii_whitespace()) {
                self.data.extend_from_slice(line.as_bytes());
            } else {
                self.data.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
            }
        }
        Ok(())
    }

    fn finish(self) -> FastaResult<Genome> {
        match self.first_id {
            Some(id) if !self.data.is_empty() => {
                Ok(Genome::from_records(id, self.data, self.records))
            }
            _ => Err(FastaError::EmptyFile),
        }
    }
}

/// Parses a FASTA file into a genome.
///
/// # Examples
///
/// ```no_run
/// use seqhighlight::fasta::parse_fasta_file;
///
/// let genome = parse_fasta_file("chr21.fa").unwrap();
/// println!("Loaded {} bp", genome.len());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Genome> {
    let file = File::open(&path)?;
    let file_size = file.metadata()?.len() as usize;

    // For large files, read entire file into memory at once (faster than line-by-line)
    if file_size > 1_000_000 {
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        let mut content = String::with_capacity(file_size);
        reader.read_to_string(&mut content)?;
        parse_fasta_str(&content)
    } else {
        parse_fasta(BufReader::new(file))
    }
}

/// Parses FASTA content from a reader.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Genome> {
    let mut builder = GenomeBuilder::default();
    for line in reader.lines() {
        builder.push_line(&line?)?;
    }
    builder.finish()
}

/// Parses FASTA content from a string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Genome> {
    let mut builder = GenomeBuilder {
        data: Vec::with_capacity(content.len()),
        ..GenomeBuilder::default()
    };
    for line in content.lines() {
        builder.push_line(line)?;
    }
    builder.finish()
}
