use anyhow::Result;
use clap::Parser;
use cotejo::cli::{Cli, OutputFormat};
use cotejo::config::AnalysisConfig;
use cotejo::pipeline::run_analysis;
use cotejo::source::CsvDirSource;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = AnalysisConfig {
        significance_level: cli.alpha,
        min_sample_size: cli.min_samples,
    };
    let source = CsvDirSource::new(&cli.root, cli.value_column).with_file_name(&cli.metrics_file);

    let report = run_analysis(&source, &cli.groups, &cli.checkpoints, &config)?;

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_report_string()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
