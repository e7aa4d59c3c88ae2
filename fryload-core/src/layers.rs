use std::fmt::{self, Display};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use crate::consts::PRIMARY_LAYER;
use crate::errors::{FryError, Result, SpecError};
use crate::metadata::RunMetadata;

/// Splicing status of a USA-mode column block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpliceStatus {
    Spliced,
    Unspliced,
    Ambiguous,
}

impl FromStr for SpliceStatus {
    type Err = SpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "S" => Ok(SpliceStatus::Spliced),
            "U" => Ok(SpliceStatus::Unspliced),
            "A" => Ok(SpliceStatus::Ambiguous),
            _ => Err(SpecError::Parse(format!("unknown splicing tag: {s}"))),
        }
    }
}

impl Display for SpliceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SpliceStatus::Spliced => "S",
            SpliceStatus::Unspliced => "U",
            SpliceStatus::Ambiguous => "A",
        };
        write!(f, "{tag}")
    }
}

/// Requested output layers: layer name to the tags summed into it, as given by
/// the caller. Keys keep their insertion order. Nothing is checked until
/// [`LayerSpec::validate`] runs, since the spec is ignored for standard mode input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSpec {
    entries: Vec<(String, Vec<String>)>,
}

impl LayerSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer, replacing the tags of an existing layer of the same name.
    pub fn insert<K, T, S>(&mut self, name: K, tags: T)
    where
        K: Into<String>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = tags,
            None => self.entries.push((name, tags)),
        }
    }

    pub fn with_layer<K, T, S>(mut self, name: K, tags: T) -> Self
    where
        K: Into<String>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, tags);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tags)| tags.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, tags)| (name.as_str(), tags.as_slice()))
    }

    /// Named output formats understood by alevin-fry loaders.
    pub fn preset(name: &str) -> Option<Self> {
        let spec = match name {
            "scRNA" | "S+A" => LayerSpec::new().with_layer("X", ["S", "A"]),
            "snRNA" | "all" | "U+S+A" => LayerSpec::new().with_layer("X", ["U", "S", "A"]),
            "velocity" => LayerSpec::new()
                .with_layer("X", ["S", "A"])
                .with_layer("spliced", ["S", "A"])
                .with_layer("unspliced", ["U"]),
            "raw" => LayerSpec::new()
                .with_layer("X", ["S"])
                .with_layer("spliced", ["S"])
                .with_layer("unspliced", ["U"])
                .with_layer("ambiguous", ["A"]),
            _ => return None,
        };
        Some(spec)
    }

    /// Read a JSON object mapping layer names to arrays of tags. Layers keep
    /// the order they have in the file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json_err = |source: serde_json::Error| FryError::Json {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path)?;
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_reader(BufReader::new(file)).map_err(json_err)?;

        let mut spec = LayerSpec::new();
        for (name, tags) in map {
            let tags: Vec<String> = serde_json::from_value(tags).map_err(json_err)?;
            spec.insert(name, tags);
        }
        Ok(spec)
    }

    /// Check the spec against USA mode metadata and turn it into a [`LayerPlan`].
    ///
    /// The gene count is checked first so that a bad descriptor is reported
    /// regardless of what was requested.
    pub fn validate(&self, meta: &RunMetadata) -> std::result::Result<LayerPlan, SpecError> {
        if meta.num_genes % 3 != 0 {
            return Err(SpecError::MalformedGeneCount {
                num_genes: meta.num_genes,
            });
        }

        if self.is_empty() {
            return Err(SpecError::Empty);
        }

        if self.get(PRIMARY_LAYER).is_none() {
            return Err(SpecError::MissingPrimary);
        }

        let mut primary = Vec::new();
        let mut side_layers = Vec::new();

        for (name, tags) in self.iter() {
            let statuses = tags
                .iter()
                .map(|t| t.parse::<SpliceStatus>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| SpecError::UnknownTag {
                    layer: name.to_string(),
                    tags: tags.to_vec(),
                })?;

            if statuses.is_empty() {
                return Err(SpecError::EmptyLayer {
                    layer: name.to_string(),
                });
            }

            if name == PRIMARY_LAYER {
                primary = statuses;
            } else {
                side_layers.push((name.to_string(), statuses));
            }
        }

        Ok(LayerPlan {
            primary,
            side_layers,
        })
    }
}

/// Parses `X=S+A,unspliced=U`.
impl FromStr for LayerSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut spec = LayerSpec::new();

        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, tags) = pair
                .split_once('=')
                .ok_or_else(|| SpecError::Parse(format!("expected name=TAGS, found: {pair}")))?;

            let name = name.trim();
            if name.is_empty() {
                return Err(SpecError::Parse(format!("missing layer name in: {pair}")));
            }
            if spec.get(name).is_some() {
                return Err(SpecError::Parse(format!("layer {name} given more than once")));
            }

            let tags = tags
                .split('+')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from);

            spec.insert(name, tags);
        }

        Ok(spec)
    }
}

impl Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .iter()
            .map(|(name, tags)| format!("{}={}", name, tags.join("+")))
            .collect();
        write!(f, "{}", pairs.join(","))
    }
}

/// A validated [`LayerSpec`]. Every tag list is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPlan {
    pub primary: Vec<SpliceStatus>,
    pub side_layers: Vec<(String, Vec<SpliceStatus>)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    use SpliceStatus::*;

    #[fixture]
    fn usa_meta() -> RunMetadata {
        RunMetadata {
            num_genes: 9,
            usa_mode: true,
            source: PathBuf::from("quant.json"),
        }
    }

    #[rstest]
    fn test_validate_keeps_order(usa_meta: RunMetadata) {
        let spec = LayerSpec::new()
            .with_layer("X", ["S", "A"])
            .with_layer("unspliced", ["U"]);

        let plan = spec.validate(&usa_meta).unwrap();

        assert_eq!(plan.primary, vec![Spliced, Ambiguous]);
        assert_eq!(plan.side_layers, vec![("unspliced".to_string(), vec![Unspliced])]);
    }

    #[rstest]
    fn test_validate_gene_count_checked_first(mut usa_meta: RunMetadata) {
        usa_meta.num_genes = 10;
        let res = LayerSpec::new().validate(&usa_meta);
        assert_eq!(res, Err(SpecError::MalformedGeneCount { num_genes: 10 }));
    }

    #[rstest]
    fn test_validate_empty(usa_meta: RunMetadata) {
        assert_eq!(LayerSpec::new().validate(&usa_meta), Err(SpecError::Empty));
    }

    #[rstest]
    fn test_validate_missing_primary(usa_meta: RunMetadata) {
        let spec = LayerSpec::new().with_layer("spliced", ["S"]);
        assert_eq!(spec.validate(&usa_meta), Err(SpecError::MissingPrimary));
    }

    #[rstest]
    fn test_validate_unknown_tag(usa_meta: RunMetadata) {
        let spec = LayerSpec::new()
            .with_layer("X", ["S"])
            .with_layer("weird", ["U", "Z"]);

        assert_eq!(
            spec.validate(&usa_meta),
            Err(SpecError::UnknownTag {
                layer: "weird".to_string(),
                tags: vec!["U".to_string(), "Z".to_string()],
            })
        );
    }

    #[rstest]
    fn test_validate_empty_layer(usa_meta: RunMetadata) {
        let spec = LayerSpec::new()
            .with_layer("X", ["S"])
            .with_layer("nothing", Vec::<String>::new());

        assert_eq!(
            spec.validate(&usa_meta),
            Err(SpecError::EmptyLayer {
                layer: "nothing".to_string()
            })
        );
    }

    #[rstest]
    #[case("scRNA", vec![Spliced, Ambiguous], 0)]
    #[case("S+A", vec![Spliced, Ambiguous], 0)]
    #[case("snRNA", vec![Unspliced, Spliced, Ambiguous], 0)]
    #[case("velocity", vec![Spliced, Ambiguous], 2)]
    #[case("raw", vec![Spliced], 3)]
    fn test_presets(
        usa_meta: RunMetadata,
        #[case] name: &str,
        #[case] primary: Vec<SpliceStatus>,
        #[case] n_side: usize,
    ) {
        let plan = LayerSpec::preset(name).unwrap().validate(&usa_meta).unwrap();
        assert_eq!(plan.primary, primary);
        assert_eq!(plan.side_layers.len(), n_side);
    }

    #[rstest]
    fn test_unknown_preset() {
        assert!(LayerSpec::preset("bulk").is_none());
    }

    #[rstest]
    fn test_parse_from_str() {
        let spec: LayerSpec = "X=S+A, unspliced=U".parse().unwrap();

        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("X").unwrap(), ["S", "A"]);
        assert_eq!(spec.get("unspliced").unwrap(), ["U"]);
        assert_eq!(spec.to_string(), "X=S+A,unspliced=U");
    }

    #[rstest]
    #[case("X")]
    #[case("=S")]
    #[case("X=S,X=Z")]
    fn test_parse_from_str_bad(#[case] input: &str) {
        assert!(matches!(input.parse::<LayerSpec>(), Err(SpecError::Parse(_))));
    }

    #[rstest]
    fn test_insert_replaces() {
        let mut spec = LayerSpec::new().with_layer("X", ["S"]);
        spec.insert("X", ["U"]);
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get("X").unwrap(), ["U"]);
    }

    #[rstest]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layers.json");
        std::fs::write(
            &path,
            r#"{"X": ["S"], "unspliced": ["U"], "ambiguous": ["A"]}"#,
        )
        .unwrap();

        let spec = LayerSpec::from_json_file(&path).unwrap();
        assert_eq!(spec.to_string(), "X=S,unspliced=U,ambiguous=A");
    }

    #[rstest]
    fn test_from_json_file_bad_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layers.json");
        std::fs::write(&path, r#"{"X": "S"}"#).unwrap();

        assert!(matches!(
            LayerSpec::from_json_file(&path),
            Err(FryError::Json { .. })
        ));
    }
}
