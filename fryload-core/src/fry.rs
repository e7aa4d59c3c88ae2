use std::fmt::{self, Display};
use std::path::Path;

use log::{info, warn};

use crate::combine::assemble;
use crate::errors::{Result, SpecError};
use crate::layers::LayerSpec;
use crate::loader::{MatrixReader, MtxReader, load_quants};
use crate::metadata::resolve_metadata;
use crate::models::AnnotatedMatrix;

/// Why a load stopped without producing a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Neither `quant.json` nor `meta_info.json` was found.
    MetadataNotFound,
    /// The gene count or the layer specification is unusable for USA-mode input.
    InvalidSpec(SpecError),
}

impl Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::MetadataNotFound => {
                write!(f, "found neither quant.json nor meta_info.json")
            }
            AbortReason::InvalidSpec(err) => write!(f, "{err}"),
        }
    }
}

/// Outcome of a load that did not hit an I/O or format error.
#[derive(Debug, Clone)]
pub enum FryLoad {
    Loaded(AnnotatedMatrix),
    Aborted(AbortReason),
}

impl FryLoad {
    pub fn into_matrix(self) -> Option<AnnotatedMatrix> {
        match self {
            FryLoad::Loaded(adata) => Some(adata),
            FryLoad::Aborted(_) => None,
        }
    }
}

/// Load an alevin-fry quantification directory.
///
/// `layers` maps output names to the U/S/A blocks summed into them and must hold
/// an `X` entry; it is ignored when the run was not quantified in USA mode.
///
/// Returns `Ok(None)` when there is no run descriptor or the requested layers
/// don't fit the run. Missing or corrupt count files are errors. With `verbose`
/// the reason for every abort is logged.
///
/// ```no_run
/// use std::path::Path;
/// use fryload_core::{LayerSpec, load_fry};
///
/// let layers: LayerSpec = "X=S+A,unspliced=U".parse().unwrap();
/// let adata = load_fry(Path::new("quant_res"), &layers, true).unwrap();
/// ```
pub fn load_fry(frydir: &Path, layers: &LayerSpec, verbose: bool) -> Result<Option<AnnotatedMatrix>> {
    try_load_fry(frydir, layers, verbose, &MtxReader).map(FryLoad::into_matrix)
}

/// Like [`load_fry`], but reports why a load was aborted and reads the count
/// matrix through `reader`.
pub fn try_load_fry<R: MatrixReader + ?Sized>(
    frydir: &Path,
    layers: &LayerSpec,
    verbose: bool,
    reader: &R,
) -> Result<FryLoad> {
    let Some(meta) = resolve_metadata(frydir, verbose)? else {
        return Ok(FryLoad::Aborted(AbortReason::MetadataNotFound));
    };

    let plan = if meta.usa_mode {
        match layers.validate(&meta) {
            Ok(plan) => {
                if verbose {
                    info!("processing input in USA mode, will return {layers}");
                }
                Some(plan)
            }
            Err(err) => {
                if verbose {
                    warn!("{err}; cannot proceed.");
                }
                return Ok(FryLoad::Aborted(AbortReason::InvalidSpec(err)));
            }
        }
    } else {
        if verbose {
            info!("processing input in standard mode, will return spliced count");
        }
        None
    };

    let quants = load_quants(frydir, meta.gene_count(), reader)?;
    if verbose {
        info!(
            "read {} barcodes x {} features from {}",
            quants.matrix.rows(),
            quants.matrix.cols(),
            frydir.display()
        );
    }

    let adata = assemble(quants, plan.as_ref())?;
    Ok(FryLoad::Loaded(adata))
}
