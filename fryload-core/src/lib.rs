//! Load alevin-fry quantification output as annotated cell-by-gene matrices.
//!
//! A quantification directory holds a run descriptor (`quant.json`, or
//! `meta_info.json` for older runs) and a barcode-by-feature count matrix under
//! `alevin/`. For runs quantified in USA mode the matrix carries three column
//! blocks per gene (spliced, unspliced, ambiguous); a [`LayerSpec`] says which
//! of them are summed into the primary matrix `X` and into any extra layers.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use fryload_core::{LayerSpec, load_fry};
//!
//! let layers = LayerSpec::preset("velocity").unwrap();
//! if let Some(adata) = load_fry(Path::new("quant_res"), &layers, false).unwrap() {
//!     println!("{} cells x {} genes", adata.n_obs(), adata.n_vars());
//! }
//! ```

pub mod combine;
pub mod consts;
pub mod errors;
pub mod fry;
pub mod layers;
pub mod loader;
pub mod matrix_market;
pub mod metadata;
pub mod models;

// re-exports
pub use combine::*;
pub use errors::*;
pub use fry::*;
pub use layers::*;
pub use loader::*;
pub use matrix_market::*;
pub use metadata::*;
pub use models::*;
