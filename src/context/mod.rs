//! The pinned resource context
//!
//! A [`Context`] remembers a resource type, optionally with a name, that the
//! shell injects into later commands. The REPL owns the single
//! [`ContextStore`]; the prompt and the completer hold [`ContextView`]s that
//! can read but never write.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

mod apply;

pub use apply::{apply_context, implicit_type};

/// Current pin: nothing, a type, or a type and a name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Context {
    #[default]
    Empty,
    Type(String),
    Resource { resource_type: String, name: String },
}

impl Context {
    /// Build from locator words
    ///
    /// # Arguments
    /// * `parts` - Zero, one or two words
    ///
    /// # Returns
    /// * `Option<Self>` - `None` if more than two words were given
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        match parts {
            [] => Some(Context::Empty),
            [resource_type] => Some(Context::Type(resource_type.clone())),
            [resource_type, name] => Some(Context::Resource {
                resource_type: resource_type.clone(),
                name: name.clone(),
            }),
            _ => None,
        }
    }

    /// The pinned words, type first
    pub fn parts(&self) -> Vec<String> {
        match self {
            Context::Empty => Vec::new(),
            Context::Type(resource_type) => vec![resource_type.clone()],
            Context::Resource {
                resource_type,
                name,
            } => vec![resource_type.clone(), name.clone()],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Context::Empty => 0,
            Context::Type(_) => 1,
            Context::Resource { .. } => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Context::Empty)
    }

    pub fn resource_type(&self) -> Option<&str> {
        match self {
            Context::Empty => None,
            Context::Type(resource_type) | Context::Resource { resource_type, .. } => {
                Some(resource_type)
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Context::Resource { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts().join("/"))
    }
}

/// Owner of the process-wide pin
///
/// Not `Clone`: there is exactly one writer. Readers come from [`reader`].
///
/// [`reader`]: ContextStore::reader
#[derive(Debug, Default)]
pub struct ContextStore {
    current: Arc<RwLock<Context>>,
}

/// Read-only handle to the pin
#[derive(Debug, Clone)]
pub struct ContextView {
    current: Arc<RwLock<Context>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pin wholesale
    pub fn set(&mut self, context: Context) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = context;
    }

    pub fn clear(&mut self) {
        self.set(Context::Empty);
    }

    pub fn get(&self) -> Context {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A read-only handle sharing this store's value
    pub fn reader(&self) -> ContextView {
        ContextView {
            current: Arc::clone(&self.current),
        }
    }
}

impl ContextView {
    pub fn get(&self) -> Context {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
