//! Word-level Markov chain text generation library.
//!
//! This crate provides a first-order Markov chain built over the words of
//! a text corpus, including:
//! - Whitespace tokenization with punctuation kept attached to words
//! - Sentence-boundary tracking through a reserved start-of-sentence key
//! - Uniform-random sentence generation with a configurable word cap
//! - Pluggable line sources for feeding corpora into the model
//!
//! Recoverable I/O faults are reported through the [`log`] facade and
//! never abort ingestion or generation.

/// Core chain model and generation logic.
///
/// This module exposes the high-level model interface while keeping
/// internal successor storage private.
pub mod model;

/// Line-source collaborators (file-backed and in-memory).
///
/// The model only requires a lazy, finite, ordered sequence of lines.
pub mod source;
