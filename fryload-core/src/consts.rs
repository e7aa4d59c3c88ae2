// Descriptor file names, tried in this order. alevin-fry >= 0.4.1 writes
// quant.json; older releases wrote meta_info.json.
pub const META_INFO_FILES: [&str; 2] = ["quant.json", "meta_info.json"];

pub const ALEVIN_DIR: &str = "alevin";
pub const MATRIX_FILE: &str = "quants_mat.mtx";
pub const GENE_LABELS_FILE: &str = "quants_mat_cols.txt";
pub const BARCODE_LABELS_FILE: &str = "quants_mat_rows.txt";

pub const PRIMARY_LAYER: &str = "X";

// USA mode stores S, U, A blocks, each num_genes / 3 columns wide.
pub const USA_BLOCKS: usize = 3;

pub const DEFAULT_PRESET: &str = "scRNA";
pub const DEFAULT_OUT: &str = "fry";
