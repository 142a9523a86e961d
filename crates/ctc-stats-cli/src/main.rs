//! ctc-stats - Track statistics tool for the CTC league
//!
//! Usage:
//!   ctc-stats <command> [OPTIONS]   Run a command over saved API responses
//!   ctc-stats --help                Show help

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    init_logging();

    match cli::parse_args(&args) {
        Ok((command, options)) => cli::run(command, options),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("Run 'ctc-stats --help' for usage.");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    // Logs go to stderr so JSON output on stdout stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
