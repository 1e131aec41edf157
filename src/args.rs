pub mod types;
pub mod validation;

pub use types::*;
pub use validation::*;

use clap::Parser;

/// Parse the command line and fold in the optional TOML config file.
///
/// # Errors
///
/// Will return `Err` if the config file is unreadable or invalid
pub fn args_checks() -> anyhow::Result<CleanArgs> {
    let cli = Cli::parse();
    load_config(cli)
}
