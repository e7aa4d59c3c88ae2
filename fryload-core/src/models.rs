use ndarray::Array1;
use sprs::CsMat;

use crate::errors::{FryError, Result};

/// Cell-by-gene count matrix with barcode and gene labels, plus named layers of the same shape.
///
/// All matrices are stored row-compressed, one row per cell.
#[derive(Debug, Clone)]
pub struct AnnotatedMatrix {
    x: CsMat<f64>,
    obs_names: Vec<String>,
    var_names: Vec<String>,
    layers: Vec<(String, CsMat<f64>)>,
}

impl AnnotatedMatrix {
    /// Wrap `x`, whose rows are `obs_names` (barcodes) and columns `var_names` (genes).
    pub fn new(x: CsMat<f64>, obs_names: Vec<String>, var_names: Vec<String>) -> Result<Self> {
        let expected = (obs_names.len(), var_names.len());
        if x.shape() != expected {
            return Err(FryError::ShapeMismatch {
                expected,
                found: x.shape(),
            });
        }

        Ok(AnnotatedMatrix {
            x: to_csr(x),
            obs_names,
            var_names,
            layers: Vec::new(),
        })
    }

    /// Attach a side layer. Re-using a name replaces the old layer.
    pub fn add_layer(&mut self, name: &str, layer: CsMat<f64>) -> Result<()> {
        if layer.shape() != self.shape() {
            return Err(FryError::LayerShape {
                layer: name.to_string(),
                expected: self.shape(),
                found: layer.shape(),
            });
        }

        let layer = to_csr(layer);
        match self.layers.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = layer,
            None => self.layers.push((name.to_string(), layer)),
        }
        Ok(())
    }

    pub fn x(&self) -> &CsMat<f64> {
        &self.x
    }

    pub fn obs_names(&self) -> &[String] {
        &self.obs_names
    }

    pub fn var_names(&self) -> &[String] {
        &self.var_names
    }

    pub fn layer(&self, name: &str) -> Option<&CsMat<f64>> {
        self.layers.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(n, _)| n.as_str())
    }

    pub fn layers(&self) -> impl Iterator<Item = (&str, &CsMat<f64>)> {
        self.layers.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    pub fn n_obs(&self) -> usize {
        self.obs_names.len()
    }

    pub fn n_vars(&self) -> usize {
        self.var_names.len()
    }

    /// Total counts per gene in `X`.
    pub fn gene_totals(&self) -> Array1<f64> {
        let mut totals = Array1::<f64>::zeros(self.n_vars());
        for row in self.x.outer_iterator() {
            for (col, &val) in row.iter() {
                totals[col] += val;
            }
        }
        totals
    }

    /// Total counts per cell in `X`.
    pub fn cell_totals(&self) -> Array1<f64> {
        self.x
            .outer_iterator()
            .map(|row| row.data().iter().sum())
            .collect()
    }
}

fn to_csr(mat: CsMat<f64>) -> CsMat<f64> {
    if mat.is_csr() { mat } else { mat.into_csr() }
}
