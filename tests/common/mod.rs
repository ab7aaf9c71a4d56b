//! In-memory fake of the annotation service for workflow tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::Path;

use labelpush::error::LabelpushError;
use labelpush::service::{
    AnnotationService, Dataset, ImageHandle, LabelClass, LabelClassSpec, LabelPayload, Project,
};

/// Records every call it receives and hands out deterministic identifiers
/// (`project-1`, `dataset-2`, ...). Files whose names appear in
/// `reject_files` fail upload with the validation error the real service
/// would produce.
#[derive(Default)]
pub struct FakeService {
    next_id: Cell<u64>,
    pub reject_files: HashSet<String>,
    pub datasets: RefCell<Vec<String>>,
    pub classes: RefCell<Vec<LabelClassSpec>>,
    pub submissions: RefCell<Vec<(String, Vec<LabelPayload>)>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            reject_files: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    fn next(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{prefix}-{id}")
    }
}

impl AnnotationService for FakeService {
    fn create_project(&self, name: &str) -> Result<Project, LabelpushError> {
        Ok(Project {
            id: self.next("project"),
            name: name.to_string(),
            workspace_id: Some("workspace-1".to_string()),
        })
    }

    fn create_dataset(&self, _project: &Project, name: &str) -> Result<Dataset, LabelpushError> {
        self.datasets.borrow_mut().push(name.to_string());
        Ok(Dataset {
            id: self.next("dataset"),
            name: name.to_string(),
        })
    }

    fn upload_image(
        &self,
        _project: &Project,
        _dataset: &Dataset,
        path: &Path,
    ) -> Result<ImageHandle, LabelpushError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        if self.reject_files.contains(&name) {
            return Err(LabelpushError::ImageRejected {
                path: path.to_path_buf(),
                reason: "unsupported image content".to_string(),
            });
        }

        Ok(ImageHandle {
            id: self.next("image"),
            name,
        })
    }

    fn create_label_class(
        &self,
        _project: &Project,
        spec: &LabelClassSpec,
    ) -> Result<LabelClass, LabelpushError> {
        self.classes.borrow_mut().push(spec.clone());
        Ok(LabelClass {
            id: self.next("class"),
            name: spec.name.clone(),
        })
    }

    fn submit_labels(
        &self,
        _project: &Project,
        image: &ImageHandle,
        labels: &[LabelPayload],
    ) -> Result<(), LabelpushError> {
        self.submissions
            .borrow_mut()
            .push((image.id.clone(), labels.to_vec()));
        Ok(())
    }
}
