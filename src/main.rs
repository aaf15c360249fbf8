//! foreman-inventory entry point
//!
//! Parses arguments, installs stderr logging, runs the inventory pipeline and
//! prints its JSON to stdout. Any unrecovered error is reported on stderr and
//! the process exits with status 1.

use clap::Parser;
use foreman_inventory::cli::Cli;
use foreman_inventory::core::user_friendly_error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(json) => println!("{json}"),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
