use clap::{Arg, Command};

pub const INFO_CMD: &str = "info";

pub fn create_info_cli() -> Command {
    Command::new(INFO_CMD)
        .about("Show the run metadata and matrix dimensions of an alevin-fry quantification directory.")
        .arg(Arg::new("frydir").required(true))
}
