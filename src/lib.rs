//! Labelpush: push a local image directory into a hosted annotation service.
//!
//! Labelpush provisions a project under a configured workspace, uploads
//! every file from a local directory into a newly created dataset, and —
//! when a manifest is given — creates label classes and attaches labels to
//! the uploaded images. The whole run is a single sequential pass over a
//! blocking HTTP API: no retries, no rollback, per-item failures are logged
//! and skipped.
//!
//! # Modules
//!
//! - [`service`]: annotation-service types, the [`service::AnnotationService`]
//!   trait, and the HTTP implementation
//! - [`manifest`]: the JSON label-manifest format
//! - [`upload`], [`classes`], [`labels`]: the three batch stages
//! - [`report`]: structured per-record skip reporting
//! - [`error`]: error types for labelpush operations

pub mod classes;
pub mod error;
pub mod labels;
pub mod manifest;
pub mod report;
pub mod service;
pub mod upload;

use std::path::{Path, PathBuf};

use clap::Parser;

pub use error::LabelpushError;

use service::{AnnotationService, HttpService, ServiceConfig};

/// The labelpush CLI application.
#[derive(Parser)]
#[command(name = "labelpush")]
#[command(version, about)]
struct Cli {
    /// Name of the project to create in the workspace.
    project_name: String,

    /// Path to the directory of images to upload.
    images_dir: PathBuf,

    /// Optional JSON manifest of label classes and per-image labels.
    manifest: Option<PathBuf>,

    /// API key for the annotation service.
    #[arg(long, env = "LABELPUSH_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the annotation service API.
    #[arg(long, env = "LABELPUSH_BASE_URL")]
    base_url: String,

    /// Workspace identifier to create the project under.
    #[arg(long, env = "LABELPUSH_WORKSPACE")]
    workspace: String,
}

/// Run the labelpush CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LabelpushError> {
    let cli = Cli::parse();

    let service = HttpService::new(ServiceConfig {
        api_key: cli.api_key,
        base_url: cli.base_url,
        workspace_id: cli.workspace,
    })?;

    run_with(
        &service,
        &cli.project_name,
        &cli.images_dir,
        cli.manifest.as_deref(),
    )
}

/// Drives the full workflow against any [`AnnotationService`]:
/// create project → upload images → create label classes → apply labels.
///
/// The label stages run only when `manifest_path` is given. A failure in
/// project or dataset creation, in manifest parsing, or in any service call
/// other than a per-file upload rejection aborts the run.
pub fn run_with(
    service: &dyn AnnotationService,
    project_name: &str,
    images_dir: &Path,
    manifest_path: Option<&Path>,
) -> Result<(), LabelpushError> {
    let project = service.create_project(project_name)?;
    println!("Created project '{}' with ID: {}", project.name, project.id);

    let (image_map, upload_report) = upload::upload_images(service, &project, images_dir)?;
    println!("{upload_report}");

    let Some(manifest_path) = manifest_path else {
        return Ok(());
    };

    let manifest = manifest::read_manifest(manifest_path)?;

    let (class_map, class_report) =
        classes::create_label_classes(service, &project, &manifest.label_classes)?;
    println!("{class_report}");

    let label_report =
        labels::apply_labels(service, &project, &image_map, &class_map, &manifest.images)?;
    println!("{label_report}");

    Ok(())
}
