use std::path::PathBuf;

use clap::Args;

use crate::catalog::index::WindowSearch;
use crate::catalog::store::LipidLibrary;
use crate::cli::OutputFormat;
use crate::core::peak::QuerySpectrum;
use crate::core::types::{IntensityBasis, IonMode};
use crate::matching::engine::{
    Annotation, AnnotationConfig, AnnotationEngine, Evaluation, EvaluationStatus,
};
use crate::matching::rules::RuleOutcome;
use crate::matching::scoring::ScoreMode;
use crate::parsing::spectrum::load_spectra;

#[derive(Args)]
pub struct AnnotateArgs {
    /// Query spectra (MGF or JSON, optionally gzipped)
    #[arg(required = true)]
    pub queries: PathBuf,

    /// Lipid library (TSV, CSV or JSON, optionally gzipped)
    #[arg(short, long, required = true)]
    pub library: PathBuf,

    /// JSON file with annotation settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Precursor tolerance in Da
    #[arg(long)]
    pub ms1_tolerance: Option<f64>,

    /// Fragment tolerance in Da
    #[arg(long)]
    pub ms2_tolerance: Option<f64>,

    /// Minimum abundance of chain fragments
    #[arg(long)]
    pub chain_fragment_abundance: Option<f64>,

    /// Minimum abundance when matching reference-spectrum peaks
    #[arg(long)]
    pub reference_fragment_abundance: Option<f64>,

    /// Peak channel thresholds are compared against
    #[arg(long, value_enum)]
    pub intensity_basis: Option<IntensityBasis>,

    /// Category scoring
    #[arg(long, value_enum)]
    pub score_mode: Option<ScoreMode>,

    /// How the precursor window start is located
    #[arg(long, value_enum)]
    pub window_search: Option<WindowSearch>,

    /// Use raw intensities instead of scaling each spectrum to base peak 100
    #[arg(long)]
    pub no_normalize: bool,

    /// Ion mode for MGF spectra that carry no charge or polarity
    #[arg(long, value_enum, default_value = "positive")]
    pub ion_mode: IonMode,

    /// Worker threads for batch annotation (defaults to all cores)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Report the outcome for every library entry in each precursor window
    #[arg(long)]
    pub trace: bool,
}

/// Execute annotate subcommand
///
/// # Errors
///
/// Returns an error if the inputs cannot be read or the settings are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AnnotateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = build_config(&args)?;

    let library = LipidLibrary::load_from_file(&args.library)?;
    if verbose {
        eprintln!("Loaded library with {} entries", library.len());
    }
    if library.is_empty() {
        eprintln!("Warning: Library is empty, no entries to annotate against.");
        return Ok(());
    }

    let queries = load_spectra(&args.queries, args.ion_mode)?;
    if verbose {
        eprintln!("Loaded {} query spectra", queries.len());
    }

    let engine = AnnotationEngine::with_config(&library, config);

    if args.trace {
        let traces: Vec<(&QuerySpectrum, Vec<Evaluation>)> = queries
            .iter()
            .map(|q| (q, engine.characterize_with_trace(q)))
            .collect();
        match format {
            OutputFormat::Text => print_text_trace(&traces),
            OutputFormat::Json => print_json_trace(&traces)?,
            OutputFormat::Tsv => print_tsv_trace(&traces),
        }
        return Ok(());
    }

    let annotations = match args.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(|| engine.annotate_batch(&queries)),
        None => engine.annotate_batch(&queries),
    };

    if verbose {
        let annotated = annotations.iter().filter(|a| a.result.is_some()).count();
        eprintln!("Annotated {annotated} of {} spectra", annotations.len());
    }

    match format {
        OutputFormat::Text => print_text_results(&annotations),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&annotations)?),
        OutputFormat::Tsv => print_tsv_results(&annotations),
    }

    Ok(())
}

fn build_config(args: &AnnotateArgs) -> anyhow::Result<AnnotationConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => AnnotationConfig::default(),
    };

    if let Some(value) = args.ms1_tolerance {
        config.ms1_tolerance = value;
    }
    if let Some(value) = args.ms2_tolerance {
        config.ms2_tolerance = value;
    }
    if let Some(value) = args.chain_fragment_abundance {
        config.chain_fragment_abundance = value;
    }
    if let Some(value) = args.reference_fragment_abundance {
        config.reference_fragment_abundance = value;
    }
    if let Some(value) = args.intensity_basis {
        config.intensity_basis = value;
    }
    if let Some(value) = args.score_mode {
        config.score_mode = value;
    }
    if let Some(value) = args.window_search {
        config.window_search = value;
    }
    if args.no_normalize {
        config.normalize_queries = false;
    }

    config.validate()?;
    Ok(config)
}

fn format_rt(rt: Option<f64>) -> String {
    rt.map(|rt| format!("{rt:.2}")).unwrap_or_default()
}

fn print_text_results(annotations: &[Annotation]) {
    for (i, annotation) in annotations.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }

        let rt = annotation
            .rt
            .map(|rt| format!(", RT {rt:.2} min"))
            .unwrap_or_default();
        println!(
            "\n#{} {} (m/z {:.4}{})",
            i + 1,
            annotation.query_id,
            annotation.precursor_mz,
            rt
        );

        let Some(result) = &annotation.result else {
            println!("   No annotation");
            continue;
        };

        let c = &result.characterization;
        println!("   Annotation: {}", result.name);
        println!("   Class: {}", result.class);
        println!("   Adduct: {}", result.adduct);
        println!("   Level: {}", result.level);
        println!(
            "\n   Score: {:.3} = {:.3} class + {:.3} chain + {:.3} position + {:.3} double bond",
            result.score,
            c.class_ion_score,
            c.chain_ion_score,
            c.position_ion_score,
            c.double_bond_ion_score,
        );
        println!("   Matched ions: {}", result.matched_ion_count);
        println!(
            "   Library entry: {} ({:.4})",
            result.reference_name, result.mz
        );
    }

    let annotated = annotations.iter().filter(|a| a.result.is_some()).count();
    println!("\nAnnotated {annotated} of {} spectra", annotations.len());
}

fn print_tsv_results(annotations: &[Annotation]) {
    println!(
        "query_id\tprecursor_mz\trt\tname\tclass\tadduct\tlevel\tscore\tclass_score\tchain_score\tposition_score\tdouble_bond_score\tmatched_ions\tlibrary_entry"
    );
    for annotation in annotations {
        let rt = format_rt(annotation.rt);
        match &annotation.result {
            Some(r) => {
                let c = &r.characterization;
                println!(
                    "{}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{}\t{}",
                    annotation.query_id,
                    annotation.precursor_mz,
                    rt,
                    r.name,
                    r.class,
                    r.adduct,
                    r.level,
                    r.score,
                    c.class_ion_score,
                    c.chain_ion_score,
                    c.position_ion_score,
                    c.double_bond_ion_score,
                    r.matched_ion_count,
                    r.reference_name,
                );
            }
            None => println!(
                "{}\t{:.4}\t{}\t\t\t\t\t\t\t\t\t\t\t",
                annotation.query_id, annotation.precursor_mz, rt
            ),
        }
    }
}

/// Short status label and detail for one trace record
fn describe(evaluation: &Evaluation) -> (&'static str, String) {
    match &evaluation.status {
        EvaluationStatus::Evaluated(RuleOutcome::Matched(candidates)) => (
            "matched",
            candidates
                .first()
                .map(|c| format!("{} (score {:.3})", c.name, c.score))
                .unwrap_or_default(),
        ),
        EvaluationStatus::Evaluated(RuleOutcome::NoMatch(rejection)) => {
            ("rejected", rejection.to_string())
        }
        EvaluationStatus::NoRule => ("no_rule", String::new()),
        EvaluationStatus::IonModeMismatch => ("ion_mode_mismatch", String::new()),
    }
}

fn print_text_trace(traces: &[(&QuerySpectrum, Vec<Evaluation>)]) {
    for (i, (query, evaluations)) in traces.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }
        println!("\n{} (m/z {:.4})", query.id, query.precursor_mz);
        if evaluations.is_empty() {
            println!("   No library entries in precursor window");
        }
        for evaluation in evaluations {
            let (status, detail) = describe(evaluation);
            println!(
                "   {} {} ({:.4}): {}{}",
                evaluation.reference_name,
                evaluation.adduct,
                evaluation.reference_mz,
                status,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!(", {detail}")
                }
            );
        }
    }
}

fn print_json_trace(traces: &[(&QuerySpectrum, Vec<Evaluation>)]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = traces
        .iter()
        .map(|(query, evaluations)| {
            serde_json::json!({
                "query_id": query.id,
                "precursor_mz": query.precursor_mz,
                "evaluations": evaluations,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_trace(traces: &[(&QuerySpectrum, Vec<Evaluation>)]) {
    println!("query_id\tlibrary_entry\tlibrary_mz\tclass\tadduct\tstatus\tdetail");
    for (query, evaluations) in traces {
        for evaluation in evaluations {
            let (status, detail) = describe(evaluation);
            println!(
                "{}\t{}\t{:.4}\t{}\t{}\t{}\t{}",
                query.id,
                evaluation.reference_name,
                evaluation.reference_mz,
                evaluation.class,
                evaluation.adduct,
                status,
                detail
            );
        }
    }
}
