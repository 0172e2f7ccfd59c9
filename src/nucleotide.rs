//! Nucleotide helpers shared by the views.
//!
//! This module provides:
//! - Base complementation and reverse complement of query strings
//! - The classic nucleotide color table used by the nucleotide view

use crate::model::Rgb;

/// Returns the Watson-Crick complement of a base.
///
/// Only upper-case A, C, G and T are complemented; every other byte is
/// returned unchanged so that it keeps never matching the genome.
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

/// Reverses a sequence and complements each base.
///
/// Works on raw bytes, so the result always has the length of the input
/// even when the input is not ASCII.
pub fn reverse_complement<S: AsRef<[u8]> + ?Sized>(seq: &S) -> Vec<u8> {
    seq.as_ref().iter().rev().map(|&b| complement(b)).collect()
}

/// Color of a single nucleotide in the classic palette.
pub fn classic_color(base: u8) -> Rgb {
    match base.to_ascii_uppercase() {
        b'A' => Rgb::new(0, 0, 0),
        b'C' => Rgb::new(255, 0, 0),
        b'G' => Rgb::new(0, 255, 0),
        b'T' => Rgb::new(0, 0, 255),
        _ => Rgb::new(200, 200, 200),
    }
}
