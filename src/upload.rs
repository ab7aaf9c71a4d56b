//! Directory upload stage.

use std::collections::BTreeMap;
use std::path::Path;

use log::error;
use walkdir::WalkDir;

use crate::error::LabelpushError;
use crate::report::{SkipReason, StageReport};
use crate::service::{AnnotationService, ImageHandle, Project};

/// Progress is printed after every this many directory entries. Feedback
/// cadence only; nothing is flushed or retried at this boundary.
const PROGRESS_INTERVAL: usize = 20;

/// Uploads every file in `images_dir` into a new dataset under `project`.
///
/// The dataset is named after the final path segment of `images_dir`. Files
/// are processed one at a time in file-name order; a file the service
/// rejects as an invalid image is logged and skipped, any other failure
/// aborts the run. The returned map is keyed by the server-assigned image
/// name, which is assumed unique per directory — a colliding name silently
/// overwrites the earlier entry.
///
/// # Errors
/// Returns `NotADirectory` without creating a dataset when `images_dir` does
/// not reference an existing directory, and propagates dataset-creation and
/// non-validation upload failures.
pub fn upload_images(
    service: &dyn AnnotationService,
    project: &Project,
    images_dir: &Path,
) -> Result<(BTreeMap<String, ImageHandle>, StageReport), LabelpushError> {
    if !images_dir.is_dir() {
        return Err(LabelpushError::NotADirectory {
            path: images_dir.to_path_buf(),
        });
    }

    let dataset_name = dataset_name(images_dir)?;
    let dataset = service.create_dataset(project, dataset_name)?;
    println!(
        "Created dataset '{}' with ID: {}",
        dataset.name, dataset.id
    );

    let mut uploaded = BTreeMap::new();
    let mut report = StageReport::new("uploaded");

    // Immediate children only; the original flat-listed the directory.
    // Sorted for deterministic processing order.
    for entry in WalkDir::new(images_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| {
            std::io::Error::other(format!("failed listing '{}': {source}", images_dir.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        match service.upload_image(project, &dataset, entry.path()) {
            Ok(image) => {
                uploaded.insert(image.name.clone(), image);
                report.succeed();
            }
            Err(LabelpushError::ImageRejected { path, reason }) => {
                error!("skipping '{}': {reason}", path.display());
                report.skip(
                    entry.file_name().to_string_lossy(),
                    SkipReason::RejectedUpload { path, reason },
                );
            }
            Err(other) => return Err(other),
        }

        if report.processed() % PROGRESS_INTERVAL == 0 {
            println!("  ... {} entries processed", report.processed());
        }
    }

    Ok((uploaded, report))
}

/// The dataset takes its name from the directory's final path segment.
fn dataset_name(images_dir: &Path) -> Result<&str, LabelpushError> {
    images_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LabelpushError::EmptyDatasetName {
            path: images_dir.to_path_buf(),
        })
}
