mod cli;
mod logging;
mod pipeline;
mod report;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lexis_core::config::{load_dotenv, Config};
use lexis_core::{FileType, LexisError};
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::report::RunReport;

/// Reject inputs that cannot be analyzed before any work starts.
fn validate_input(path: &Path) -> Result<(), LexisError> {
    if !path.exists() {
        return Err(LexisError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    if FileType::from_extension(&ext).is_none() {
        return Err(LexisError::UnsupportedType(if ext.is_empty() {
            "(no extension)".to_string()
        } else {
            ext
        }));
    }
    Ok(())
}

async fn run(args: &CliArgs, config: &Config) -> Result<()> {
    let analysis = pipeline::analyze(&args.file, config)
        .with_context(|| format!("failed to analyze {}", args.file.display()))?;

    report::print_stats(&analysis.stats);
    if let Some(structure) = &analysis.structure {
        report::print_structure(structure);
    }

    let images = if args.no_images {
        None
    } else {
        let export = pipeline::export_images(&analysis.document, args.output_dir.as_deref())
            .context("failed to extract images")?;
        if let Some(export) = &export {
            report::print_images(export);
        }
        export
    };

    // A failed summary must not cost the analysis: the report is still
    // written and the error is returned afterwards.
    let (summary, summary_error) = if args.no_summary {
        (None, None)
    } else {
        info!("starting summary generation");
        println!("{}", "=".repeat(70));
        println!("Generating summary with the language model...");
        println!("(this can take a few minutes on the first run)");
        println!("{}\n", "=".repeat(70));

        match pipeline::summarize(&analysis.document.full_text(), config).await {
            Ok(outcome) => {
                report::print_summary(&outcome);
                (Some(outcome), None)
            }
            Err(e) => {
                error!(error = %e, "summary generation failed");
                (None, Some(e))
            }
        }
    };

    if let Some(path) = &args.report {
        let run_report = RunReport {
            stats: &analysis.stats,
            structure: analysis.structure.as_ref(),
            images: images.as_ref(),
            summary: summary.as_ref(),
        };
        report::write_markdown(path, &run_report)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        println!("Markdown report saved to: {}\n", path.display());
    }

    let page_errors: Vec<LexisError> = analysis.document.page_errors().collect();
    if !page_errors.is_empty() {
        println!("Note: {} page(s) could not be read:", page_errors.len());
        for err in &page_errors {
            println!("   - {err}");
        }
        if let Some(hint) = page_errors[0].hint() {
            println!("   ({hint})");
        }
        println!();
    }

    if let Some(e) = summary_error {
        return Err(anyhow::Error::new(e).context("failed to generate summary"));
    }

    println!("{}", "=".repeat(70));
    println!("Done.");
    println!("{}\n", "=".repeat(70));
    Ok(())
}

fn report_failure(err: &anyhow::Error) {
    error!("{err:#}");
    eprintln!("\nError: {err:#}");
    let hint = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<LexisError>())
        .and_then(LexisError::hint);
    if let Some(hint) = hint {
        eprintln!("Hint: {hint}");
    }
    eprintln!();
}

async fn try_main(args: CliArgs) -> Result<()> {
    validate_input(&args.file).context("invalid input")?;

    logging::init(args.verbose, args.quiet, args.log_file.as_deref())?;

    load_dotenv();
    let mut config = Config::from_env();
    args.apply_overrides(&mut config);
    config.log_summary();

    run(&args, &config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    match try_main(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}
