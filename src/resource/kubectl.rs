use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::{Resource, ResourceFinder};
use crate::command::Catalog;
use crate::error::{LookupError, Result};

/// Finds resources by running `kubectl get ... -o json`
pub struct KubectlFinder {
    binary: String,
    namespace: Option<String>,
    catalog: Arc<Catalog>,
}

/// The parts of an API object (or list of them) the shell needs
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiObject {
    kind: String,
    metadata: ObjectMeta,
    items: Vec<ApiObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObjectMeta {
    name: String,
}

impl KubectlFinder {
    /// # Arguments
    /// * `binary` - kubectl executable
    /// * `namespace` - Namespace passed to every lookup, if set
    /// * `catalog` - Used to map API kinds to canonical nouns
    pub fn new(binary: impl Into<String>, namespace: Option<String>, catalog: Arc<Catalog>) -> Self {
        Self {
            binary: binary.into(),
            namespace,
            catalog,
        }
    }

    fn arguments(&self, locator: &[String]) -> Result<Vec<String>> {
        let (resource_type, name) = match locator {
            [] => return Err(LookupError::MissingType.into()),
            [resource_type] => (resource_type, None),
            [resource_type, name, ..] => (resource_type, Some(name)),
        };

        let mut args = vec!["get".to_string(), resource_type.clone()];
        args.extend(name.cloned());
        args.extend(["-o".to_string(), "json".to_string()]);
        if let Some(namespace) = &self.namespace {
            args.extend(["--namespace".to_string(), namespace.clone()]);
        }
        Ok(args)
    }

    /// Canonical noun for an API kind
    fn plural(&self, kind: &str) -> String {
        self.catalog
            .canonical_type(kind)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}s", kind.to_lowercase()))
    }

    /// Decode `kubectl -o json` output into descriptors
    fn parse(&self, stdout: &[u8]) -> Result<Vec<Resource>> {
        let object: ApiObject = serde_json::from_slice(stdout)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        let objects = if object.kind.ends_with("List") || !object.items.is_empty() {
            object.items
        } else {
            vec![object]
        };

        Ok(objects
            .into_iter()
            .filter(|o| !o.metadata.name.is_empty())
            .map(|o| Resource::new(self.plural(&o.kind), o.metadata.name))
            .collect())
    }
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("NotFound") || stderr.contains("not found")
}

#[async_trait]
impl ResourceFinder for KubectlFinder {
    async fn lookup(&self, locator: &[String]) -> Result<Vec<Resource>> {
        let args = self.arguments(locator)?;
        debug!("running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| LookupError::Failed(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_not_found(&stderr) {
                return Ok(Vec::new());
            }
            return Err(LookupError::Failed(stderr.trim().to_string()).into());
        }

        self.parse(&output.stdout)
    }
}
