//! Genome and query files read from disk.

use std::io::Write;

use tempfile::{tempdir, NamedTempFile};

use seqhighlight::config::{Config, HighlightConfig};
use seqhighlight::fasta::{parse_fasta_file, FastaError};
use seqhighlight::highlight::query::{load_query_file, QueryFileError};
use seqhighlight::highlight::HighlightDisplay;
use seqhighlight::model::{AppState, Genome};

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_multi_record_genome() {
    let file = temp_file(">chr1 first\nacgtACGT\nNN\n>chr2\nTTTT\n");
    let genome = parse_fasta_file(file.path()).unwrap();
    assert_eq!(genome.id, "chr1");
    assert_eq!(genome.record_count, 2);
    assert_eq!(genome.as_bytes(), b"ACGTACGTNNTTTT");
}

#[test]
fn test_load_large_genome() {
    let line = "ACGT".repeat(20);
    let mut content = String::from(">big\n");
    for _ in 0..15_000 {
        content.push_str(&line);
        content.push('\n');
    }
    let file = temp_file(&content);
    let genome = parse_fasta_file(file.path()).unwrap();
    assert_eq!(genome.len(), 80 * 15_000);
    assert_eq!(&genome.as_bytes()[..8], b"ACGTACGT");
}

#[test]
fn test_missing_genome() {
    let dir = tempdir().unwrap();
    let result = parse_fasta_file(dir.path().join("missing.fa"));
    assert!(matches!(result, Err(FastaError::IoError(_))));
}

#[test]
fn test_import_query_file() {
    let file = temp_file(">header\nACGT\n\nTTTT\n");
    let mut display = HighlightDisplay::new(&HighlightConfig::default());

    let count = display.open_query_file(file.path()).unwrap();
    assert_eq!(count, 2);
    let texts: Vec<&str> = display.queries().iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["ACGT", "TTTT"]);
}

#[test]
fn test_import_windows_line_endings() {
    let file = temp_file(">h\r\nGATTACA\r\n\r\nCCGG\r\n");
    assert_eq!(load_query_file(file.path()).unwrap(), vec!["GATTACA", "CCGG"]);
}

#[test]
fn test_failed_import_keeps_queries() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("queries.txt");
    let mut display = HighlightDisplay::new(&HighlightConfig {
        queries: vec!["ACGT".to_string(), "GGGG".to_string()],
        ..HighlightConfig::default()
    });

    let result = display.open_query_file(&missing);
    assert!(matches!(result, Err(QueryFileError::Io { .. })));
    assert_eq!(display.queries().len(), 2);
    assert_eq!(display.queries().get(1).unwrap().text, "GGGG");
}

#[test]
fn test_open_command_reports_count() {
    let file = temp_file("ACGT\nTTTT\nGGCC\n");
    let path = file.path().to_str().unwrap().to_string();
    let mut state = AppState::new(Genome::new("g", "ACGTACGT"), "g.fa".to_string(), &Config::default());

    state.open_query_file(&path);
    assert_eq!(state.highlight.queries().len(), 3);
    assert_eq!(
        state.status_message.as_deref(),
        Some(format!("Searching 3 entries in: {}", path).as_str())
    );
}
