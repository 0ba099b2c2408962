use std::process::ExitCode;

use clap::error::ErrorKind::{DisplayHelp, DisplayVersion};
use clap::Parser;
use obsidian_pandoc_prep::{Cli, Command, Error, ErrorKind};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), DisplayHelp | DisplayVersion) => e.exit(),
        Err(e) => return report(Error::Usage(e.render().to_string())),
    };
    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Command::ExportTldraw(args) => cmd::export::run(args),
        Command::RestoreMath { file } => cmd::restore_math::run(file),
        Command::Sanitize { file } => cmd::sanitize::run(file),
        Command::RestoreEmbeds { file } => cmd::restore_embeds::run(file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

fn report(error: Error) -> ExitCode {
    match error.kind() {
        // clap's rendering already carries its own "error:" prefix and usage line
        ErrorKind::UsageError => eprint!("{}", error),
        _ => eprintln!("Error: {}", error),
    }
    ExitCode::FAILURE
}

/// Uses `RUST_LOG` if set, otherwise the verbosity flags. Logs go to stderr.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

mod cmd {
    pub mod export;
    pub mod restore_embeds;
    pub mod restore_math;
    pub mod sanitize;
}
