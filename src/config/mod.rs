//! Configuration module for Job-Trawler
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are applied on top of the loaded
//! configuration by the binary before validation.
//!
//! # Example
//!
//! ```no_run
//! use job_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Searching {} in {}", config.search.query, config.search.city);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_identities, Config, IdentityEntry, OutputConfig, SearchConfig, SelectorConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
