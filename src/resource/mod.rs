//! Resource lookup against the cluster
//!
//! A [`ResourceFinder`] answers "which objects of this type (and name)
//! exist?". Completion and the `pin` command are its only callers, and both
//! go through [`TimeoutFinder`] so a slow API server never stalls the prompt.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

mod kubectl;
mod timeout;

pub use kubectl::KubectlFinder;
pub use timeout::TimeoutFinder;

/// One object in the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Canonical plural type noun, e.g. `pods`
    pub resource_type: String,
    /// Instance name
    pub name: String,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.name)
    }
}

/// Source of resource descriptors
#[async_trait]
pub trait ResourceFinder: Send + Sync {
    /// Look up resources by locator
    ///
    /// # Arguments
    /// * `locator` - `[type]` or `[type, name]`
    ///
    /// # Returns
    /// * `Result<Vec<Resource>>` - Matches; no match is an empty list, not an error
    async fn lookup(&self, locator: &[String]) -> Result<Vec<Resource>>;
}
