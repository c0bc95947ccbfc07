//! maasctl - command-line client for the MAAS REST API
//!
//! Without a subcommand prints the node list, the MAAS server name and the
//! server hostname.

use clap::Parser;
use maasctl::cli::Cli;
use maasctl::{commands, errors, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = commands::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(errors::exit_code_for(&e));
    }
}
