//! mcd-target-hunter - Find target markers in CNC post-processor output.
//!
//! Scans machine-control output files line by line for a target marker
//! (e.g. `POST-GENERATED`) and records, for every hit, the most recent
//! operation name, operation number, tool number and tool change lines seen
//! before it. Hits are written to a CSV report.
//!
//! # Modules
//!
//! - [`scan`] - The single-pass context scanner and tool-number detection
//! - [`input`] - Reading and decoding input files
//! - [`report`] - CSV report writing and report naming
//! - [`config`] - Saved settings and default locations
//! - [`commands`] - High-level operations shared by the CLI and MCP server
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod input;
pub mod report;
pub mod scan;

#[cfg(feature = "mcp")]
pub mod mcp;
