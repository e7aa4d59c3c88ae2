use std::ops::Range;

use sprs::CsMat;

use crate::consts::USA_BLOCKS;
use crate::errors::{FryError, Result};
use crate::layers::{LayerPlan, SpliceStatus};
use crate::loader::RawQuants;
use crate::models::AnnotatedMatrix;

/// Column blocks of a USA-mode matrix: spliced, then unspliced, then ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsaRanges {
    genes: usize,
}

impl UsaRanges {
    /// `genes` is the number of genes per block, i.e. a third of the matrix width.
    pub fn new(genes: usize) -> Self {
        UsaRanges { genes }
    }

    pub fn range(&self, status: SpliceStatus) -> Range<usize> {
        let ng = self.genes;
        match status {
            SpliceStatus::Spliced => 0..ng,
            SpliceStatus::Unspliced => ng..2 * ng,
            SpliceStatus::Ambiguous => 2 * ng..3 * ng,
        }
    }

    pub fn width(&self) -> usize {
        USA_BLOCKS * self.genes
    }
}

/// Sum the column blocks named by `tags`, in order.
///
/// `raw` must be column-compressed. The first block is the base; a single tag is
/// a plain slice.
///
/// # Panics
/// If `tags` is empty. A [`LayerPlan`] never holds an empty tag list.
pub(crate) fn combine_tags(raw: &CsMat<f64>, ranges: &UsaRanges, tags: &[SpliceStatus]) -> CsMat<f64> {
    let (first, rest) = tags
        .split_first()
        .expect("layer plans always carry at least one tag");

    let mut acc = raw.slice_outer(ranges.range(*first)).to_owned();
    for tag in rest {
        acc = &acc + &raw.slice_outer(ranges.range(*tag));
    }
    acc
}

/// Build the annotated result. With a plan the raw matrix is treated as USA-mode
/// output; without one it becomes `X` as is.
pub fn assemble(quants: RawQuants, plan: Option<&LayerPlan>) -> Result<AnnotatedMatrix> {
    let RawQuants {
        matrix,
        genes,
        barcodes,
    } = quants;

    let Some(plan) = plan else {
        return AnnotatedMatrix::new(matrix, barcodes, genes);
    };

    let raw = if matrix.is_csc() {
        matrix
    } else {
        matrix.into_csc()
    };
    let ranges = UsaRanges::new(genes.len());
    if raw.cols() != ranges.width() {
        return Err(FryError::ShapeMismatch {
            expected: (barcodes.len(), ranges.width()),
            found: raw.shape(),
        });
    }

    let x = combine_tags(&raw, &ranges, &plan.primary);
    let mut adata = AnnotatedMatrix::new(x, barcodes, genes)?;

    for (name, tags) in &plan.side_layers {
        adata.add_layer(name, combine_tags(&raw, &ranges, tags))?;
    }

    Ok(adata)
}
