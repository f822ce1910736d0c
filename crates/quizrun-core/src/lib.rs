//! quizrun-core — Question model, scoring engine, and session controller.
//!
//! This crate defines the question data model, section grouping, seeded
//! shuffling, the two scoring regimes, and the interactive session state
//! machine that the rest of quizrun builds on.

pub mod classifier;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod statistics;
pub mod traits;
