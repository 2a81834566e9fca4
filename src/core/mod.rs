//! Core modules: the entity model, the filter state and engine, tree
//! navigation, expansion, summaries and the command-line plumbing around them.

pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod navigator;
pub mod store;
pub mod summary;
pub mod time;
pub mod tui;
