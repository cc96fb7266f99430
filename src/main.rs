use clap::Parser;
use erf_processor::cli::Args;
use erf_processor::pipeline::ErfProcessor;
use std::process;

fn main() {
    let args = Args::parse();

    setup_logging(&args);

    let config = match args.to_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    };

    let result = ErfProcessor::new(config).and_then(|processor| processor.process());

    match result {
        Ok(_stats) => {
            // Success - the summary has already been printed by the processor
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Route log output through tracing with a crate-scoped default filter
fn setup_logging(args: &Args) {
    use tracing_subscriber::EnvFilter;

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("erf_processor={}", log_level)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
