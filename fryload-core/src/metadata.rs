use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::consts::{META_INFO_FILES, USA_BLOCKS};
use crate::errors::{FryError, Result};

/// The parts of the run descriptor needed to rebuild the count matrix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunMetadata {
    pub num_genes: usize,
    pub usa_mode: bool,
    #[serde(skip)]
    pub source: PathBuf,
}

impl RunMetadata {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut meta: RunMetadata =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| FryError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        meta.source = path.to_path_buf();
        Ok(meta)
    }

    /// Number of genes in the output matrix. In USA mode the descriptor counts
    /// every S/U/A column, so this is a third of `num_genes`.
    ///
    /// Only meaningful once `num_genes` is known to be a multiple of 3.
    pub fn gene_count(&self) -> usize {
        if self.usa_mode {
            self.num_genes / USA_BLOCKS
        } else {
            self.num_genes
        }
    }
}

/// Find the run descriptor inside `frydir` and parse it.
///
/// Returns `Ok(None)` when neither `quant.json` nor `meta_info.json` exist, which
/// happens for output of unsupported alevin-fry versions. A descriptor that exists
/// but can't be parsed is an error.
pub fn resolve_metadata(frydir: &Path, verbose: bool) -> Result<Option<RunMetadata>> {
    let [current, legacy] = META_INFO_FILES;

    let mut path = frydir.join(current);
    if !path.exists() {
        if verbose {
            info!("Did not find a {current} file, checking for older {legacy}.");
        }
        path = frydir.join(legacy);
        if !path.exists() {
            if verbose {
                info!("Found no {legacy} file either; cannot proceed.");
            }
            return Ok(None);
        }
    }

    RunMetadata::from_file(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn frydir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn test_prefers_quant_json(frydir: TempDir) {
        fs::write(frydir.path().join("quant.json"), r#"{"num_genes": 9, "usa_mode": true}"#).unwrap();
        fs::write(frydir.path().join("meta_info.json"), r#"{"num_genes": 4, "usa_mode": false}"#).unwrap();

        let meta = resolve_metadata(frydir.path(), false).unwrap().unwrap();

        assert_eq!(meta.num_genes, 9);
        assert_eq!(meta.usa_mode, true);
        assert_eq!(meta.gene_count(), 3);
        assert_eq!(meta.source, frydir.path().join("quant.json"));
    }

    #[rstest]
    fn test_falls_back_to_meta_info(frydir: TempDir) {
        fs::write(
            frydir.path().join("meta_info.json"),
            r#"{"num_genes": 4, "usa_mode": false, "alt_resolved_cell_numbers": []}"#,
        )
        .unwrap();

        let meta = resolve_metadata(frydir.path(), true).unwrap().unwrap();

        assert_eq!(meta.num_genes, 4);
        assert_eq!(meta.gene_count(), 4);
    }

    #[rstest]
    fn test_missing_descriptor_is_none(frydir: TempDir) {
        let meta = resolve_metadata(frydir.path(), true).unwrap();
        assert!(meta.is_none());
    }

    #[rstest]
    fn test_malformed_descriptor_is_error(frydir: TempDir) {
        fs::write(frydir.path().join("quant.json"), r#"{"num_genes": "nine"}"#).unwrap();

        let res = resolve_metadata(frydir.path(), false);
        assert!(matches!(res, Err(FryError::Json { .. })));
    }
}
