//! Daily noun-frequency comparison across news homepages.
//!
//! The binary wires these modules together; they are public so the ranking
//! and caching logic can be exercised without a terminal.

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod frequency;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod stopwords;
pub mod tokenizer;
pub mod ui;
pub mod utils;
