mod info;
mod load;

use anyhow::Result;
use clap::Command;
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "fryload";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Turn alevin-fry quantification output into cell-by-gene count matrices.")
        .subcommand_required(true)
        .subcommand(load::cli::create_load_cli())
        .subcommand(info::cli::create_info_cli())
}

/// Info level with --verbose, warnings otherwise. RUST_LOG still wins when set.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // LOAD
        //
        Some((load::cli::LOAD_CMD, matches)) => {
            load::handlers::run_load(matches)?;
        }

        //
        // INFO
        //
        Some((info::cli::INFO_CMD, matches)) => {
            info::handlers::run_info(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
