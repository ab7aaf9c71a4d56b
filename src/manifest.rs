//! Label manifest parsing.
//!
//! The manifest is a single JSON document with two top-level collections:
//! `label_classes` (class definitions to create in the project) and `images`
//! (per-image label assignments). Both keys are required; per-record fields
//! are kept optional here so that malformed entries deserialize and can be
//! validated individually by the stage that consumes them, instead of one
//! bad record failing the whole file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::error::LabelpushError;

/// The parsed manifest document.
#[derive(Clone, Debug, Deserialize)]
pub struct Manifest {
    /// Label classes to create in the project.
    pub label_classes: Vec<LabelClassDef>,

    /// Per-image label assignments.
    pub images: Vec<ImageEntry>,
}

/// One label-class definition. `class_name` and `class_type` are required by
/// contract but optional here; see module docs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LabelClassDef {
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub class_type: Option<String>,

    /// Display ordering hint, forwarded as-is when present.
    #[serde(default)]
    pub norder: Option<f64>,

    /// Display color, forwarded as-is when present.
    #[serde(default)]
    pub color: Option<String>,
}

/// Labels to attach to one uploaded image.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub image_name: Option<String>,

    #[serde(default)]
    pub labels: Vec<LabelDef>,
}

/// One label on an image. Geometry fields are opaque to this tool and
/// forwarded to the service untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LabelDef {
    #[serde(default)]
    pub class_name: Option<String>,

    #[serde(default)]
    pub bbox: Option<Value>,

    #[serde(default)]
    pub mask: Option<Value>,

    #[serde(default)]
    pub polygon: Option<Value>,

    #[serde(default)]
    pub z_index: Option<Value>,
}

/// Reads a manifest from a JSON file.
///
/// A missing `label_classes` or `images` key fails the parse with an error
/// naming the absent field, so no classes are created and no labels applied
/// from a structurally invalid manifest.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn read_manifest(path: &Path) -> Result<Manifest, LabelpushError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        warn!("manifest '{}' does not end in .json", path.display());
    }

    let file = File::open(path).map_err(|source| LabelpushError::ManifestOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| LabelpushError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(json: &str) -> Result<Manifest, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn parses_complete_manifest() {
        let manifest = parse(
            r##"{
                "label_classes": [
                    {"class_name": "cat", "class_type": "tag", "norder": 1, "color": "#ff0000"}
                ],
                "images": [
                    {"image_name": "a.jpg", "labels": [
                        {"class_name": "cat", "bbox": [0, 0, 1, 1], "z_index": 3}
                    ]}
                ]
            }"##,
        )
        .expect("manifest should parse");

        assert_eq!(manifest.label_classes.len(), 1);
        assert_eq!(manifest.label_classes[0].class_name.as_deref(), Some("cat"));
        assert_eq!(manifest.label_classes[0].norder, Some(1.0));
        assert_eq!(manifest.images.len(), 1);
        assert_eq!(manifest.images[0].labels.len(), 1);
        assert!(manifest.images[0].labels[0].bbox.is_some());
        assert!(manifest.images[0].labels[0].mask.is_none());
    }

    #[test]
    fn missing_top_level_key_fails_naming_the_field() {
        let err = parse(r#"{"label_classes": []}"#).expect_err("images key is required");
        assert!(err.to_string().contains("images"));

        let err = parse(r#"{"images": []}"#).expect_err("label_classes key is required");
        assert!(err.to_string().contains("label_classes"));
    }

    #[test]
    fn malformed_records_still_deserialize() {
        let manifest = parse(
            r##"{
                "label_classes": [{"color": "#00ff00"}],
                "images": [{"labels": []}]
            }"##,
        )
        .expect("per-record validation happens later");

        assert!(manifest.label_classes[0].class_name.is_none());
        assert!(manifest.images[0].image_name.is_none());
    }

    #[test]
    fn read_manifest_reports_missing_file() {
        let err = read_manifest(Path::new("/nonexistent/labels.json"))
            .expect_err("open should fail");
        assert!(matches!(err, LabelpushError::ManifestOpen { .. }));
    }

    #[test]
    fn read_manifest_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("labels.json");
        let mut file = File::create(&path).expect("create");
        file.write_all(br#"{"label_classes": [], "images": []}"#)
            .expect("write");

        let manifest = read_manifest(&path).expect("manifest should parse");
        assert!(manifest.label_classes.is_empty());
        assert!(manifest.images.is_empty());
    }
}
