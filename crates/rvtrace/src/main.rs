//! RVTRACE CLI - emulator vs RTL trace comparison

mod cli;

use std::io;

use clap::Parser;
use console::style;
use rvtrace::{Report, compare_files};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, EXIT_FATAL, EXIT_MISMATCH, EXIT_SUCCESS};

fn main() {
    let cli = Cli::parse();

    let metrics_handle = if cli.metrics {
        rvtrace::metrics::CliRecorder::new().install()
    } else {
        None
    };
    rvtrace::metrics::init();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(cli.log_directive().parse().unwrap()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let exit_code = run(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    let config = cli.config();
    debug!(?config, isa = %config.isa, "starting comparison");

    let stdout = io::stdout();
    let color = cli.color.enabled(console::colors_enabled());
    let mut report = Report::new(stdout.lock(), color);

    match compare_files(&cli.emu, &cli.rtl, &config, &mut report) {
        Ok(summary) if summary.is_clean() => EXIT_SUCCESS,
        Ok(_) => EXIT_MISMATCH,
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            EXIT_FATAL
        }
    }
}
