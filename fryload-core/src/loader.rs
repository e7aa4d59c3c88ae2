use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use sprs::CsMat;

use crate::consts::{ALEVIN_DIR, BARCODE_LABELS_FILE, GENE_LABELS_FILE, MATRIX_FILE};
use crate::errors::{FryError, Result};

/// Source of the raw barcode-by-feature count matrix.
pub trait MatrixReader {
    fn read_matrix(&self, path: &Path) -> Result<CsMat<f64>>;
}

/// Reads Matrix Market coordinate files, as written by `alevin-fry quant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtxReader;

impl MatrixReader for MtxReader {
    fn read_matrix(&self, path: &Path) -> Result<CsMat<f64>> {
        let triplets = sprs::io::read_matrix_market::<f64, usize, _>(path).map_err(|e| {
            FryError::MatrixMarket {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(triplets.to_csc())
    }
}

/// Raw artifacts of a quantification directory.
#[derive(Debug, Clone)]
pub struct RawQuants {
    /// barcodes x features, column-compressed
    pub matrix: CsMat<f64>,
    pub genes: Vec<String>,
    pub barcodes: Vec<String>,
}

/// Paths of the three artifacts under `<frydir>/alevin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantFiles {
    pub matrix: PathBuf,
    pub genes: PathBuf,
    pub barcodes: PathBuf,
}

impl QuantFiles {
    pub fn new(frydir: &Path) -> Self {
        let alevin = frydir.join(ALEVIN_DIR);
        QuantFiles {
            matrix: alevin.join(MATRIX_FILE),
            genes: alevin.join(GENE_LABELS_FILE),
            barcodes: alevin.join(BARCODE_LABELS_FILE),
        }
    }

    fn check_exists(&self) -> Result<()> {
        for path in [&self.matrix, &self.genes, &self.barcodes] {
            if !path.exists() {
                return Err(FryError::MissingArtifact(path.clone()));
            }
        }
        Ok(())
    }
}

/// Read newline-delimited labels, keeping at most `limit` of them.
pub fn read_labels(path: &Path, limit: Option<usize>) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    for line in reader.lines() {
        if limit.is_some_and(|n| labels.len() >= n) {
            break;
        }
        labels.push(line?.trim_end().to_string());
    }

    Ok(labels)
}

/// Load the count matrix and its labels.
///
/// Gene labels are cut down to `gene_count`: in USA mode the column file may list
/// more entries than there are genes in the collapsed output.
pub fn load_quants<R: MatrixReader + ?Sized>(
    frydir: &Path,
    gene_count: usize,
    reader: &R,
) -> Result<RawQuants> {
    let files = QuantFiles::new(frydir);
    files.check_exists()?;

    let matrix = reader.read_matrix(&files.matrix)?;

    let genes = read_labels(&files.genes, Some(gene_count))?;
    if genes.len() != gene_count {
        return Err(FryError::LabelCount {
            path: files.genes,
            expected: gene_count,
            found: genes.len(),
        });
    }

    let barcodes = read_labels(&files.barcodes, None)?;
    if barcodes.len() != matrix.rows() {
        return Err(FryError::LabelCount {
            path: files.barcodes,
            expected: matrix.rows(),
            found: barcodes.len(),
        });
    }

    Ok(RawQuants {
        matrix,
        genes,
        barcodes,
    })
}
