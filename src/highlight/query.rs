//! Query sequences and bulk query import.
//!
//! A query file holds one query per line. Lines starting with `>` are
//! headers and skipped, as are blank lines, so a FASTA file of short
//! single-line records can be used directly.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PLACEHOLDER_QUERY;
use crate::model::Rgb;

/// Strong-match colors handed out to new queries, in order.
const PALETTE: [Rgb; 8] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 200, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 140, 0),
    Rgb::new(160, 32, 240),
    Rgb::new(0, 206, 209),
    Rgb::new(255, 20, 147),
    Rgb::new(154, 205, 50),
];

/// Errors that can occur while importing a query file.
#[derive(Error, Debug)]
pub enum QueryFileError {
    #[error("Could not read the file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A sequence to highlight, with its two display colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Display label ("Sequence N")
    pub label: String,
    /// The query text; empty queries are never scored
    pub text: String,
    /// Color of positions that agree with the query
    pub strong_color: Rgb,
    /// Color of mismatching positions inside a match
    pub near_color: Rgb,
}

impl Query {
    /// Creates a query whose near color is a darker shade of `strong_color`.
    pub fn new(label: impl Into<String>, text: impl Into<String>, strong_color: Rgb) -> Self {
        Self::with_colors(label, text, strong_color, strong_color.scaled(3, 5))
    }

    /// Creates a query with explicit colors.
    pub fn with_colors(
        label: impl Into<String>,
        text: impl Into<String>,
        strong_color: Rgb,
        near_color: Rgb,
    ) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            strong_color,
            near_color,
        }
    }

    /// Returns true if the query has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered collection of queries.
///
/// Registration order matters: it decides which query wins a pixel
/// claimed by several matches.
#[derive(Debug, Clone, Default)]
pub struct QueryRegistry {
    queries: Vec<Query>,
    /// Number of queries ever created, for labels and colors
    row_count: usize,
}

impl QueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query and returns its index.
    pub fn add(&mut self, text: impl Into<String>) -> usize {
        let color = PALETTE[self.row_count % PALETTE.len()];
        self.row_count += 1;
        let label = format!("Sequence {}", self.row_count);
        self.queries.push(Query::new(label, text, color));
        self.queries.len() - 1
    }

    /// Appends the placeholder query to an empty registry, or an empty
    /// query otherwise.
    pub fn add_new(&mut self) -> usize {
        if self.queries.is_empty() {
            self.add(PLACEHOLDER_QUERY)
        } else {
            self.add(String::new())
        }
    }

    /// Replaces the text of a query. Returns false for a bad index.
    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.queries.get_mut(index) {
            Some(query) => {
                query.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Removes a query.
    pub fn remove(&mut self, index: usize) -> Option<Query> {
        (index < self.queries.len()).then(|| self.queries.remove(index))
    }

    /// Removes every query.
    pub fn clear(&mut self) {
        self.queries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Query> {
        self.queries.get(index)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Query> {
        self.queries.iter()
    }

    /// Queries that take part in matching, in registration order.
    pub fn active(&self) -> impl Iterator<Item = &Query> {
        self.queries.iter().filter(|q| !q.is_empty())
    }
}

/// Reads queries from a reader, one per line.
///
/// Carriage returns and newlines are stripped; header (`>`) and blank
/// lines produce no query. Other characters are kept as-is.
pub fn read_queries<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut queries = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        if line.first() == Some(&b'>') {
            continue;
        }
        let text: String = String::from_utf8_lossy(&line)
            .chars()
            .filter(|&c| c != '\r' && c != '\n')
            .collect();
        if !text.is_empty() {
            queries.push(text);
        }
    }
    Ok(queries)
}

/// Reads all queries of a file.
pub fn load_query_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, QueryFileError> {
    let path = path.as_ref();
    let to_error = |source| QueryFileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(to_error)?;
    read_queries(BufReader::new(file)).map_err(to_error)
}
