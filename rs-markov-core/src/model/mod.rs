//! Top-level module for the Markov chain generation system.
//!
//! This module provides a first-order word-level Markov chain, including:
//! - The chain model itself (`ChainModel`)
//! - Generation configuration (`GenerationInput`)
//! - Internal successor-sequence storage (`Successors`)

/// First-order word-level Markov chain model.
///
/// Handles line and word ingestion, sentence-boundary tracking,
/// uniform-random sentence generation and read-only inspection.
pub mod chain_model;

/// Generation parameter structure.
///
/// Stores the word cap applied during sentence generation.
pub mod generation_input;

/// Internal representation of one successor sequence.
///
/// Tracks observed successor tokens in insertion order and supports
/// uniform random sampling. This module is not exposed publicly.
mod successors;
