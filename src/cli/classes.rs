use crate::cli::OutputFormat;
use crate::core::types::IonMode;
use crate::matching::rules::RuleRegistry;

/// Execute classes subcommand
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let registry = RuleRegistry::builtin();
    if verbose {
        eprintln!("{} class rules registered", registry.len());
    }

    let rows: Vec<_> = registry
        .classes()
        .into_iter()
        .filter_map(|class| registry.get(class).map(|rule| (class, rule.adducts())))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Class Rules ({} classes)\n", rows.len());
            println!("{:<8} {:<8} Adducts", "Class", "Header");
            println!("{}", "-".repeat(60));
            for (class, adducts) in &rows {
                let names: Vec<String> = adducts.iter().map(ToString::to_string).collect();
                println!("{:<8} {:<8} {}", class.to_string(), class.header(), names.join(", "));
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = rows
                .iter()
                .map(|(class, adducts)| {
                    let positive = adducts.iter().any(|a| a.ion_mode() == IonMode::Positive);
                    let negative = adducts.iter().any(|a| a.ion_mode() == IonMode::Negative);
                    serde_json::json!({
                        "class": class,
                        "header": class.header(),
                        "adducts": adducts,
                        "positive": positive,
                        "negative": negative,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("class\theader\tadduct\tion_mode");
            for (class, adducts) in &rows {
                for adduct in adducts {
                    println!(
                        "{}\t{}\t{}\t{}",
                        class,
                        class.header(),
                        adduct,
                        adduct.ion_mode()
                    );
                }
            }
        }
    }

    Ok(())
}
