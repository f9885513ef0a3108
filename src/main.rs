//! perfcompare - search-server latency comparison CLI

use clap::Parser;
use perfcompare::{app::App, cli::Cli, error::ErrorReporter};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors());

    if let Err(message) = cli.validate() {
        eprintln!("{}", message);
        eprintln!();
        eprintln!("{}", Cli::usage());
        process::exit(1);
    }

    if let Err(e) = App::new(cli).run().await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
