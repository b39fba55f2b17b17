//! LeadQuery command-line entry point.

use clap::Parser;
use console::style;

use leadquery::cli::{run, Args};
use leadquery::observability::{init_logging, init_logging_verbose};

fn main() {
    let args = Args::parse();
    if args.verbose {
        init_logging_verbose();
    } else {
        init_logging();
    }

    if let Err(e) = run(args) {
        eprintln!("{} {e}", style("error:").red().bold());
        std::process::exit(1);
    }
}
