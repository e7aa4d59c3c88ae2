use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use fryload_core::consts::{DEFAULT_OUT, DEFAULT_PRESET};
use fryload_core::{FryLoad, LayerSpec, MtxReader, try_load_fry, write_annotated_to_mtx};

pub fn run_load(matches: &ArgMatches) -> Result<()> {
    let frydir = matches
        .get_one::<String>("frydir")
        .expect("A path to an alevin-fry output directory is required.");

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);
    let verbose = matches.get_flag("verbose");

    crate::init_logging(verbose);

    let layers = layer_spec_from_matches(matches)?;

    let spinner = loading_spinner(verbose)?;
    spinner.set_message(format!("Loading {}", frydir));

    let load = try_load_fry(Path::new(frydir), &layers, verbose, &MtxReader);
    spinner.finish_and_clear();
    let load =
        load.with_context(|| format!("Failed to load quantification directory: {}", frydir))?;

    let adata = match load {
        FryLoad::Loaded(adata) => adata,
        FryLoad::Aborted(reason) => anyhow::bail!("Nothing loaded from {}: {}", frydir, reason),
    };

    info!(
        "Loaded {} cells x {} genes with layers [{}]",
        adata.n_obs(),
        adata.n_vars(),
        adata.layer_names().collect::<Vec<_>>().join(", ")
    );

    let written = write_annotated_to_mtx(&adata, output)
        .with_context(|| format!("Failed to write output with prefix: {}", output))?;

    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}

/// Spinner shown while the matrix loads. Hidden with --verbose so it doesn't
/// interleave with log lines on stderr.
pub fn loading_spinner(verbose: bool) -> Result<ProgressBar> {
    if verbose {
        return Ok(ProgressBar::hidden());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Pick the layer specification from --layers, --preset or --layers-json.
pub fn layer_spec_from_matches(matches: &ArgMatches) -> Result<LayerSpec> {
    if let Some(layers) = matches.get_one::<String>("layers") {
        return layers
            .parse::<LayerSpec>()
            .with_context(|| format!("Invalid layer specification: {}", layers));
    }

    if let Some(path) = matches.get_one::<String>("layers_json") {
        return LayerSpec::from_json_file(Path::new(path))
            .with_context(|| format!("Couldn't read layer specification from: {}", path));
    }

    let preset = matches
        .get_one::<String>("preset")
        .map(String::as_str)
        .unwrap_or(DEFAULT_PRESET);

    match LayerSpec::preset(preset) {
        Some(spec) => Ok(spec),
        None => anyhow::bail!("Unknown layer preset supplied: {}", preset),
    }
}
