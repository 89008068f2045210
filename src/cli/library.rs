use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::LipidLibrary;
use crate::cli::OutputFormat;
use crate::core::molecule::ReferenceMolecule;
use crate::core::types::{IonMode, LipidClass};

#[derive(Args)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommands,
}

#[derive(Subcommand)]
pub enum LibraryCommands {
    /// List library entries
    List {
        /// Library file (TSV, CSV or JSON, optionally gzipped)
        #[arg(required = true)]
        library: PathBuf,

        /// Filter by lipid class (e.g., "PC", "EtherPE", "Cer_NS")
        #[arg(long)]
        class: Option<String>,

        /// Filter by ion mode
        #[arg(long, value_enum)]
        ion_mode: Option<IonMode>,
    },

    /// Export a library as JSON
    Export {
        /// Library file to export
        #[arg(required = true)]
        library: PathBuf,

        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },
}

/// Execute library subcommand
///
/// # Errors
///
/// Returns an error if the library cannot be read or written, or the class
/// filter is unknown.
pub fn run(args: LibraryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        LibraryCommands::List {
            library,
            class,
            ion_mode,
        } => run_list(library, class.as_deref(), ion_mode, format, verbose),
        LibraryCommands::Export { library, output } => run_export(library, output),
    }
}

/// Resolve a class by its display name or name header, case-insensitively
fn parse_class(value: &str) -> anyhow::Result<LipidClass> {
    LipidClass::ALL
        .into_iter()
        .find(|c| c.to_string().eq_ignore_ascii_case(value))
        .or_else(|| LipidClass::ALL.into_iter().find(|c| c.header().eq_ignore_ascii_case(value)))
        .ok_or_else(|| anyhow::anyhow!("Unknown lipid class: {value}"))
}

#[allow(clippy::needless_pass_by_value)]
fn run_list(
    library_path: PathBuf,
    class_filter: Option<&str>,
    ion_mode: Option<IonMode>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let class = class_filter.map(parse_class).transpose()?;
    let library = LipidLibrary::load_from_file(&library_path)?;

    if verbose {
        eprintln!("Loaded library with {} entries", library.len());
    }

    let filtered: Vec<&ReferenceMolecule> = library.filter(class, ion_mode).collect();

    match format {
        OutputFormat::Text => {
            let name_width = filtered
                .iter()
                .map(|e| e.name.len().min(40))
                .max()
                .unwrap_or(4)
                .max(4);
            let class_width = filtered
                .iter()
                .map(|e| e.class.to_string().len())
                .max()
                .unwrap_or(5)
                .max(5);
            let total_width = name_width + class_width + 12 + 10 + 6 + 4;

            println!("Lipid Library ({} entries)\n", filtered.len());
            println!(
                "{:<name_w$} {:<class_w$} {:<12} {:>10} {:>6}",
                "Name",
                "Class",
                "Adduct",
                "m/z",
                "Level",
                name_w = name_width,
                class_w = class_width,
            );
            println!("{}", "-".repeat(total_width));
            for e in &filtered {
                println!(
                    "{:<name_w$} {:<class_w$} {:<12} {:>10.4} {:>6}",
                    e.name,
                    e.class.to_string(),
                    e.adduct.to_string(),
                    e.mz,
                    e.chains.level().as_u8(),
                    name_w = name_width,
                    class_w = class_width,
                );
                if verbose && !e.reference_spectrum.is_empty() {
                    println!("  └─ {} reference peaks", e.reference_spectrum.len());
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("name\tclass\tadduct\tmz\tlevel\treference_peaks");
            for e in &filtered {
                println!(
                    "{}\t{}\t{}\t{:.6}\t{}\t{}",
                    e.name,
                    e.class,
                    e.adduct,
                    e.mz,
                    e.chains.level(),
                    e.reference_spectrum.len()
                );
            }
        }
    }

    Ok(())
}

#[allow(clippy::needless_pass_by_value)]
fn run_export(library_path: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let library = LipidLibrary::load_from_file(&library_path)?;
    std::fs::write(&output, library.to_json()?)?;
    eprintln!(
        "Exported {} library entries to {}",
        library.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class() {
        assert_eq!(parse_class("pc").unwrap(), LipidClass::Pc);
        assert_eq!(parse_class("EtherPE").unwrap(), LipidClass::EtherPe);
        assert_eq!(parse_class("Cer").unwrap(), LipidClass::CerNs);
        assert_eq!(parse_class("cer_ns").unwrap(), LipidClass::CerNs);
        assert!(parse_class("XYZ").is_err());
    }
}
