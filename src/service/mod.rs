//! Annotation-service collaborators.
//!
//! This module owns the domain types created in the remote service and the
//! [`AnnotationService`] trait that the orchestration stages call through.
//! The trait exists so the driver can be exercised against a fake in tests
//! instead of a process-global HTTP client; the real implementation lives in
//! [`http`].

pub mod http;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LabelpushError;

pub use http::{HttpService, ServiceConfig};

/// A project created in the remote workspace. Top-level container for one
/// labeling effort.
#[derive(Clone, Debug, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

/// A named collection of images within a project, one per uploaded directory.
#[derive(Clone, Debug, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
}

/// Handle to an image the service has accepted. `name` is the
/// server-assigned name, normally the source file name.
#[derive(Clone, Debug, Deserialize)]
pub struct ImageHandle {
    pub id: String,
    pub name: String,
}

/// A label class created in a project.
#[derive(Clone, Debug, Deserialize)]
pub struct LabelClass {
    pub id: String,
    pub name: String,
}

/// Request payload for creating a label class. `norder` and `color` are
/// passed through unset when the manifest omits them.
#[derive(Clone, Debug, Serialize)]
pub struct LabelClassSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub class_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norder: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One label to attach to an image. Geometry is forwarded opaquely; the
/// service interprets whichever of bbox/mask/polygon is present.
#[derive(Clone, Debug, Serialize)]
pub struct LabelPayload {
    pub class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<Value>,
}

/// Everything the orchestration needs from the remote annotation service.
///
/// Implementations must surface a rejected image upload as
/// [`LabelpushError::ImageRejected`] so the batch loop can skip the file and
/// continue; all other failures are treated as fatal by callers.
pub trait AnnotationService {
    /// Create a project under the configured workspace.
    fn create_project(&self, name: &str) -> Result<Project, LabelpushError>;

    /// Create a dataset inside `project`.
    fn create_dataset(&self, project: &Project, name: &str) -> Result<Dataset, LabelpushError>;

    /// Upload the file at `path` into `dataset` as an image.
    fn upload_image(
        &self,
        project: &Project,
        dataset: &Dataset,
        path: &Path,
    ) -> Result<ImageHandle, LabelpushError>;

    /// Create one label class in `project`.
    fn create_label_class(
        &self,
        project: &Project,
        spec: &LabelClassSpec,
    ) -> Result<LabelClass, LabelpushError>;

    /// Attach `labels` to `image` in a single call.
    fn submit_labels(
        &self,
        project: &Project,
        image: &ImageHandle,
        labels: &[LabelPayload],
    ) -> Result<(), LabelpushError>;
}
