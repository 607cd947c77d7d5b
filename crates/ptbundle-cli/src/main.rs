//! ptbundle CLI - Command-line utility for bundling plugins and themes into
//! versioned ZIP archives.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Bundle(args) => commands::bundle::execute(args, &*formatter),
        cli::Commands::Version(args) => commands::version::execute(args, &*formatter),
        cli::Commands::Glob(args) => commands::glob::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    };

    if let Err(err) = result {
        formatter.format_error(&err);
        std::process::exit(1);
    }
}

/// Installs `env_logger`. `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
