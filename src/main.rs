use apidrift::cli::{parse_args, run_analyze, CliCommand, USAGE, VERSION};
use apidrift::config::AnalyzerConfig;
use apidrift::state::SessionPhase;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "apidrift=info";

/// Logs go to stderr so stdout carries only the rendered analysis.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("apidrift {}", VERSION);
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Invalid(reason) => {
            eprintln!("Error: {}\n\n{}", reason, USAGE);
            std::process::exit(2);
        }
        CliCommand::Analyze(args) => args,
    };

    color_eyre::install()?;
    init_tracing();

    let session = run_analyze(args, AnalyzerConfig::from_env()).await?;
    if session.phase() == SessionPhase::Failed {
        std::process::exit(1);
    }

    Ok(())
}
