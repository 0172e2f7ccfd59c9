//! # seqhighlight - Genome Sequence Highlighter
//!
//! A terminal-based genome browser that colors every region resembling
//! one of a set of short query sequences.
//!
//! ## Architecture
//!
//! The highlight engine is independent of the terminal:
//! - `highlight`: matcher, per-pixel reduction, compositor and query registry
//! - `nucleotide`: complement, reverse complement and base colors
//! - `view`: shared view parameters, the `View` trait and the nucleotide view
//! - `fasta`: genome loading
//! - `config`: validated runtime configuration
//! - `render`: image export of a computed frame
//! - `logging`: logger setup for the TUI and batch modes
//!
//! The interactive viewer follows an event-driven architecture:
//! - `model`: Application state
//! - `event`: Keyboard event handling (Vim-style navigation)
//! - `ui`: TUI rendering with ratatui
//! - `controller`: Orchestration of state transitions

pub mod config;
pub mod controller;
pub mod event;
pub mod fasta;
pub mod highlight;
pub mod logging;
pub mod model;
pub mod nucleotide;
pub mod render;
pub mod ui;
pub mod view;
