use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use sprs::CsMat;

use crate::consts::PRIMARY_LAYER;
use crate::errors::{FryError, Result};
use crate::models::AnnotatedMatrix;

/// Write an [`AnnotatedMatrix`] as gzipped Matrix Market files:
/// - {prefix}_X.mtx.gz: the primary matrix
/// - {prefix}_{layer}.mtx.gz: one per side layer
/// - {prefix}_barcodes.tsv.gz: cell barcodes (one per line)
/// - {prefix}_features.tsv.gz: gene ids (one per line)
///
/// Returns the paths written, matrices first.
pub fn write_annotated_to_mtx(adata: &AnnotatedMatrix, output_prefix: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let x_path = PathBuf::from(format!("{}_{}.mtx.gz", output_prefix, PRIMARY_LAYER));
    write_mtx(adata.x(), &x_path)?;
    written.push(x_path);

    for (name, layer) in adata.layers() {
        let path = PathBuf::from(format!("{}_{}.mtx.gz", output_prefix, name));
        write_mtx(layer, &path)?;
        written.push(path);
    }

    let barcodes_path = PathBuf::from(format!("{}_barcodes.tsv.gz", output_prefix));
    write_labels(adata.obs_names(), &barcodes_path)?;
    written.push(barcodes_path);

    let features_path = PathBuf::from(format!("{}_features.tsv.gz", output_prefix));
    write_labels(adata.var_names(), &features_path)?;
    written.push(features_path);

    Ok(written)
}

/// Write one matrix as a gzipped `coordinate real general` Matrix Market file.
///
/// Entries go out sorted by (row, col), 1-indexed.
pub fn write_mtx(mat: &CsMat<f64>, path: &Path) -> Result<()> {
    let mut triplets: Vec<(usize, usize, f64)> =
        mat.iter().map(|(&val, (row, col))| (row, col, val)).collect();
    triplets.sort_by_key(|&(r, c, _)| (r, c));

    let file = File::create(path)?;
    let mut writer = BufWriter::new(GzEncoder::new(file, Compression::default()));

    writeln!(writer, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(writer, "{} {} {}", mat.rows(), mat.cols(), triplets.len())?;

    for (row, col, val) in triplets {
        writeln!(writer, "{} {} {}", row + 1, col + 1, val)?;
    }

    writer.into_inner().map_err(|e| e.into_error())?.finish()?;
    Ok(())
}

/// Read the size line of a Matrix Market file: (rows, cols, entries).
///
/// Only the header is parsed; the entries are not touched.
pub fn read_mtx_header(path: &Path) -> Result<(usize, usize, usize)> {
    let malformed = |reason: &str| FryError::MatrixMarket {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        let fields = line
            .split_whitespace()
            .map(str::parse::<usize>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| malformed("size line is not numeric"))?;

        return match fields[..] {
            [rows, cols, entries] => Ok((rows, cols, entries)),
            _ => Err(malformed("expected 'rows cols entries' size line")),
        };
    }

    Err(malformed("no size line found"))
}

fn write_labels(labels: &[String], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(GzEncoder::new(file, Compression::default()));
    for label in labels {
        writeln!(writer, "{}", label)?;
    }
    writer.into_inner().map_err(|e| e.into_error())?.finish()?;
    Ok(())
}
