//! Label-class creation stage.

use std::collections::BTreeMap;

use log::warn;

use crate::error::LabelpushError;
use crate::manifest::LabelClassDef;
use crate::report::{SkipReason, StageReport};
use crate::service::{AnnotationService, LabelClassSpec, Project};

/// Creates one label class per well-formed definition and returns the
/// mapping from class name to its server-assigned identifier.
///
/// Definitions missing `class_name` or `class_type` are recorded as skips
/// and do not fail the batch. Class names are assumed unique within a
/// project; a colliding name overwrites the earlier map entry.
///
/// # Errors
/// Propagates any service failure; there is no per-class catch.
pub fn create_label_classes(
    service: &dyn AnnotationService,
    project: &Project,
    defs: &[LabelClassDef],
) -> Result<(BTreeMap<String, String>, StageReport), LabelpushError> {
    let mut classes = BTreeMap::new();
    let mut report = StageReport::new("created label classes");

    for (index, def) in defs.iter().enumerate() {
        let spec = match validate_class_def(def) {
            Ok(spec) => spec,
            Err(reason) => {
                warn!("skipping label class definition #{index}: {reason}");
                report.skip(describe_def(index, def), reason);
                continue;
            }
        };

        let created = service.create_label_class(project, &spec)?;
        classes.insert(created.name, created.id);
        report.succeed();
    }

    Ok((classes, report))
}

/// Checks a definition against its required-field contract and builds the
/// request payload. Optional fields pass through untouched.
fn validate_class_def(def: &LabelClassDef) -> Result<LabelClassSpec, SkipReason> {
    let name = def
        .class_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(SkipReason::MissingField {
            field: "class_name",
        })?;
    let class_type = def
        .class_type
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or(SkipReason::MissingField {
            field: "class_type",
        })?;

    Ok(LabelClassSpec {
        name: name.to_string(),
        class_type: class_type.to_string(),
        norder: def.norder,
        color: def.color.clone(),
    })
}

fn describe_def(index: usize, def: &LabelClassDef) -> String {
    match def.class_name.as_deref() {
        Some(name) if !name.is_empty() => format!("class '{name}'"),
        _ => format!("definition #{index}"),
    }
}
