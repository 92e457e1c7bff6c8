//! Post-search strategy engine for the ragcore retrieval engine.
//!
//! Implements the four selection/ordering strategies
//! (`relevant`/`recent`/`summary`/`diverse`) and the MMR diversification
//! algorithm with pluggable text-similarity measures. This crate is pure
//! logic — no I/O, no async suspension points — so it has no
//! dependency beyond `ragcore-core`.

pub mod engine;
pub mod mmr;
pub mod similarity;

pub use engine::{apply, parse_strategy};
pub use mmr::{select as mmr_select, MmrParams};
pub use similarity::{adaptive_algorithm, similarity};
