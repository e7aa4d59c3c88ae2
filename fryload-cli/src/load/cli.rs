use clap::{Arg, ArgAction, Command, arg};

pub const LOAD_CMD: &str = "load";

pub fn create_load_cli() -> Command {
    Command::new(LOAD_CMD)
        .about("Load an alevin-fry quantification directory and write the requested layers as Matrix Market files.")
        .arg(Arg::new("frydir").required(true).help("alevin-fry output directory (contains quant.json)"))
        .arg(
            arg!(--layers <layers>)
                .help("Layers to build, e.g. X=S+A,unspliced=U. Only used for USA mode input."),
        )
        .arg(
            arg!(--preset <preset>)
                .help("Named layer set: scRNA, snRNA, all, S+A, U+S+A, velocity or raw [default: scRNA]"),
        )
        .arg(
            Arg::new("layers_json")
                .long("layers-json")
                .value_name("FILE")
                .help("JSON file mapping layer names to lists of U/S/A tags"),
        )
        .group(
            clap::ArgGroup::new("layer_source")
                .args(["layers", "preset", "layers_json"])
                .multiple(false),
        )
        .arg(arg!(--output <output>).help("Prefix for the output files"))
        .arg(
            arg!(-v --verbose)
                .help("Report progress and the reason for an aborted load")
                .action(ArgAction::SetTrue),
        )
}
