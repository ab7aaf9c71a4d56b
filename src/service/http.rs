//! Blocking HTTP implementation of [`AnnotationService`].
//!
//! Every call is a single synchronous request against the service's REST
//! API, authenticated with an `X-Api-Key` header. There are no retries; a
//! global timeout on the agent keeps a dead endpoint from hanging the run.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::LabelpushError;

use super::{AnnotationService, Dataset, ImageHandle, LabelClass, LabelClassSpec, LabelPayload, Project};

/// Connection settings for the remote service, normally collected from CLI
/// flags or environment variables.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
    pub workspace_id: String,
}

/// `ureq`-backed annotation service client.
pub struct HttpService {
    agent: ureq::Agent,
    base_url: Url,
    api_key: String,
    workspace_id: String,
}

impl HttpService {
    /// Build a client from `config`. Fails only when the base URL does not
    /// parse.
    pub fn new(config: ServiceConfig) -> Result<Self, LabelpushError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| LabelpushError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(60)))
            .http_status_as_error(false)
            .build();
        let agent: ureq::Agent = agent_config.into();

        Ok(Self {
            agent,
            base_url,
            api_key: config.api_key,
            workspace_id: config.workspace_id,
        })
    }

    fn endpoint(&self, operation: &'static str, path: &str) -> Result<Url, LabelpushError> {
        self.base_url
            .join(path)
            .map_err(|source| LabelpushError::Transport {
                operation,
                message: source.to_string(),
            })
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &Value,
    ) -> Result<T, LabelpushError> {
        let url = self.endpoint(operation, path)?;
        debug!("POST {url}");

        let mut response = self
            .agent
            .post(url.as_str())
            .header("X-Api-Key", &self.api_key)
            .send_json(body)
            .map_err(|source| LabelpushError::Transport {
                operation,
                message: source.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LabelpushError::Api {
                operation,
                status: status.as_u16(),
                message: error_message(&mut response),
            });
        }

        response
            .body_mut()
            .read_json::<T>()
            .map_err(|source| LabelpushError::Transport {
                operation,
                message: format!("malformed response body: {source}"),
            })
    }
}

impl AnnotationService for HttpService {
    fn create_project(&self, name: &str) -> Result<Project, LabelpushError> {
        let body = serde_json::json!({
            "name": name,
            "workspace_id": self.workspace_id,
        });
        self.post_json("create project", "v1/projects", &body)
    }

    fn create_dataset(&self, project: &Project, name: &str) -> Result<Dataset, LabelpushError> {
        let body = serde_json::json!({ "name": name });
        let path = format!("v1/projects/{}/datasets", project.id);
        self.post_json("create dataset", &path, &body)
    }

    fn upload_image(
        &self,
        project: &Project,
        dataset: &Dataset,
        path: &Path,
    ) -> Result<ImageHandle, LabelpushError> {
        const OPERATION: &str = "upload image";

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image");
        let bytes = fs::read(path)?;

        let mut url = self.endpoint(
            OPERATION,
            &format!("v1/projects/{}/datasets/{}/images", project.id, dataset.id),
        )?;
        url.query_pairs_mut().append_pair("filename", file_name);
        debug!("POST {url} ({} bytes)", bytes.len());

        let mut response = self
            .agent
            .post(url.as_str())
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .send(&bytes[..])
            .map_err(|source| LabelpushError::Transport {
                operation: OPERATION,
                message: source.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == 422 {
            // The service validates image content on upload; a 422 means
            // this particular file was refused, not that the run is broken.
            return Err(LabelpushError::ImageRejected {
                path: path.to_path_buf(),
                reason: error_message(&mut response),
            });
        }
        if !status.is_success() {
            return Err(LabelpushError::Api {
                operation: OPERATION,
                status: status.as_u16(),
                message: error_message(&mut response),
            });
        }

        response
            .body_mut()
            .read_json::<ImageHandle>()
            .map_err(|source| LabelpushError::Transport {
                operation: OPERATION,
                message: format!("malformed response body: {source}"),
            })
    }

    fn create_label_class(
        &self,
        project: &Project,
        spec: &LabelClassSpec,
    ) -> Result<LabelClass, LabelpushError> {
        let body = serde_json::to_value(spec).map_err(|source| LabelpushError::Transport {
            operation: "create label class",
            message: source.to_string(),
        })?;
        let path = format!("v1/projects/{}/label_classes", project.id);
        self.post_json("create label class", &path, &body)
    }

    fn submit_labels(
        &self,
        project: &Project,
        image: &ImageHandle,
        labels: &[LabelPayload],
    ) -> Result<(), LabelpushError> {
        const OPERATION: &str = "submit labels";

        let body = serde_json::json!({ "labels": labels });
        let path = format!("v1/projects/{}/images/{}/labels", project.id, image.id);
        let url = self.endpoint(OPERATION, &path)?;
        debug!("POST {url}");

        let mut response = self
            .agent
            .post(url.as_str())
            .header("X-Api-Key", &self.api_key)
            .send_json(&body)
            .map_err(|source| LabelpushError::Transport {
                operation: OPERATION,
                message: source.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LabelpushError::Api {
                operation: OPERATION,
                status: status.as_u16(),
                message: error_message(&mut response),
            });
        }
        Ok(())
    }
}

/// Best-effort extraction of a human-readable message from an error
/// response. The service replies with `{"message": "..."}` on failures.
fn error_message(response: &mut ureq::http::Response<ureq::Body>) -> String {
    match response.body_mut().read_json::<Value>() {
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => "no error detail in response".to_string(),
    }
}
