//! # Command Line Interface
//!
//! The subcommands are in the `commands` module.
//! The `serve` subcommand logs at `info` unless `RUST_LOG` says otherwise.

use env_logger;
use c64iecd::commands;

mod cli;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    let main_cmd = cli::build_cli();
    let matches = main_cmd.clone().get_matches();
    let default_level = match matches.subcommand_name() {
        Some("serve") => "info",
        _ => "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match matches.subcommand() {
        Some(("serve",cmd)) => commands::serve::serve(cmd),
        Some(("catalog",cmd)) => commands::catalog::catalog(cmd),
        Some(("get",cmd)) => commands::get::get(cmd),
        Some(("completions",cmd)) => commands::completions::generate(main_cmd,cmd),
        _ => {
            log::error!("No subcommand was found, try `c64iecd --help`");
            Err(Box::new(commands::CommandError::InvalidCommand))
        }
    }
}
