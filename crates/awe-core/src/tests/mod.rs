//! Scenario tests for awe-core
//!
//! Covers the pieces working together rather than one module at a time:
//! - Ranking with pins, aliases, MRU boost and fallback
//! - MRU persistence, migration and write failures
//! - Provider-set resolution, aggregation and filters
//! - Session activation, the monitor picker and visibility
//! - Full configuration files

mod config_tests;
mod fixtures;
