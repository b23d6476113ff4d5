//! ## qnetsim-cli
//! **Command-line driver for quantum network simulations**
//! Builds a star of routers and relays from configuration, runs the workload on the
//! timeline and reports the inferred relay map, run statistics and trace digest.
//!
//! ### Expectations:
//! - Same configuration and seed print the same digest on every run
//! - Command-line flags override the loaded configuration
//!
//! ### Future:
//! - Loading arbitrary topologies from a description file

use clap::Parser;

mod commands;
mod scenario;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli)
}
