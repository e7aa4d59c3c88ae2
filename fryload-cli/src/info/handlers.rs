use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use fryload_core::{QuantFiles, read_labels, read_mtx_header, resolve_metadata};

pub fn run_info(matches: &ArgMatches) -> Result<()> {
    let frydir = matches
        .get_one::<String>("frydir")
        .expect("A path to an alevin-fry output directory is required.");

    crate::init_logging(false);

    let frydir = Path::new(frydir);
    let meta = match resolve_metadata(frydir, false)? {
        Some(meta) => meta,
        None => anyhow::bail!(
            "No quant.json or meta_info.json found in {}",
            frydir.display()
        ),
    };

    println!("descriptor:\t{}", meta.source.display());
    println!("usa_mode:\t{}", meta.usa_mode);
    println!("num_genes:\t{}", meta.num_genes);
    if meta.usa_mode && meta.num_genes % 3 != 0 {
        println!("genes:\tnum_genes is not a multiple of 3");
    } else {
        println!("genes:\t{}", meta.gene_count());
    }

    let files = QuantFiles::new(frydir);
    let (rows, cols, entries) = read_mtx_header(&files.matrix)
        .with_context(|| format!("Couldn't read matrix header: {}", files.matrix.display()))?;
    println!("matrix:\t{} barcodes x {} features, {} entries", rows, cols, entries);

    let barcodes = read_labels(&files.barcodes, None)
        .with_context(|| format!("Couldn't read barcodes: {}", files.barcodes.display()))?;
    println!("barcodes:\t{}", barcodes.len());

    Ok(())
}
