//! Command-line interface for lipid-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **annotate**: Annotate MS/MS query spectra against a lipid library
//! - **library**: List, filter, or export library entries
//! - **classes**: Show the registered class rules and their adducts
//!
//! ## Usage
//!
//! ```text
//! # Annotate an MGF file
//! lipid-solver annotate queries.mgf --library library.tsv
//!
//! # JSON output with tighter fragment tolerance
//! lipid-solver annotate queries.mgf -l library.tsv --ms2-tolerance 0.02 --format json
//!
//! # Show why each library entry was accepted or rejected
//! lipid-solver annotate queries.mgf -l library.tsv --trace
//!
//! # Export a text library as JSON
//! lipid-solver library export library.tsv library.json
//! ```

use clap::{Parser, Subcommand};

pub mod annotate;
pub mod classes;
pub mod library;

#[derive(Parser)]
#[command(name = "lipid-solver")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Annotate lipid class and chain composition from MS/MS spectra")]
#[command(
    long_about = "lipid-solver annotates MS/MS spectra of lipids.\n\nFor each query it finds library entries with a matching precursor m/z and applies class-specific fragmentation rules to provide:\n- The lipid class, confirmed by diagnostic ions\n- Individual chains when chain fragments resolve them\n- A score breakdown by evidence category"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate query spectra against a lipid library
    Annotate(annotate::AnnotateArgs),

    /// Inspect or convert a lipid library
    Library(library::LibraryArgs),

    /// List the registered class rules
    Classes,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
