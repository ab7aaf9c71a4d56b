//! Label application stage.

use std::collections::BTreeMap;

use log::error;

use crate::error::LabelpushError;
use crate::manifest::{ImageEntry, LabelDef};
use crate::report::{SkipReason, StageReport};
use crate::service::{AnnotationService, ImageHandle, LabelPayload, Project};

/// Attaches manifest labels to their uploaded images.
///
/// Each entry must name an uploaded image and carry at least one label; the
/// image name is resolved against `image_map` and every label's class name
/// against `class_map`. Unresolvable references are logged and skipped, and
/// the batch continues. All resolved labels for one image go to the service
/// in a single call.
///
/// # Errors
/// Propagates any submission failure; there is no per-image catch.
pub fn apply_labels(
    service: &dyn AnnotationService,
    project: &Project,
    image_map: &BTreeMap<String, ImageHandle>,
    class_map: &BTreeMap<String, String>,
    entries: &[ImageEntry],
) -> Result<StageReport, LabelpushError> {
    let mut report = StageReport::new("annotated");

    for (index, entry) in entries.iter().enumerate() {
        let Some(image_name) = entry.image_name.as_deref().filter(|name| !name.is_empty())
        else {
            report.skip(
                format!("entry #{index}"),
                SkipReason::MissingField {
                    field: "image_name",
                },
            );
            continue;
        };
        if entry.labels.is_empty() {
            report.skip(
                image_name,
                SkipReason::MissingField { field: "labels" },
            );
            continue;
        }

        let Some(image) = image_map.get(image_name) else {
            error!("no uploaded image named '{image_name}'; skipping its labels");
            report.skip(
                image_name,
                SkipReason::UnknownImage {
                    image_name: image_name.to_string(),
                },
            );
            continue;
        };

        let payloads = resolve_labels(image_name, &entry.labels, class_map);
        if payloads.is_empty() {
            report.skip(image_name, SkipReason::NoResolvableLabels);
            continue;
        }

        service.submit_labels(project, image, &payloads)?;
        report.succeed();
    }

    Ok(report)
}

/// Builds one payload per label whose class name resolves. Labels with a
/// missing or unknown class are logged and dropped.
fn resolve_labels(
    image_name: &str,
    labels: &[LabelDef],
    class_map: &BTreeMap<String, String>,
) -> Vec<LabelPayload> {
    let mut payloads = Vec::with_capacity(labels.len());

    for label in labels {
        let Some(class_name) = label.class_name.as_deref().filter(|name| !name.is_empty())
        else {
            error!("label on '{image_name}' has no class_name; dropping it");
            continue;
        };
        let Some(class_id) = class_map.get(class_name) else {
            error!("unknown label class '{class_name}' on '{image_name}'; dropping the label");
            continue;
        };

        payloads.push(LabelPayload {
            class_id: class_id.clone(),
            bbox: label.bbox.clone(),
            mask: label.mask.clone(),
            polygon: label.polygon.clone(),
            z_index: label.z_index.clone(),
        });
    }

    payloads
}
