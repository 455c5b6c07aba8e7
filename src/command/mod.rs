//! Read-only view of the kubectl command tree
//!
//! The rest of the shell only talks to the tree through the [`Command`]
//! trait: completion walks it, context application resolves the target of a
//! line against it. [`KubectlCommand`] is the production implementation,
//! backed by the embedded [`Catalog`].

pub mod catalog;
pub mod flags;
mod kubectl;

pub use catalog::{Catalog, CommandNode, EXIT_COMMAND, PIN_COMMAND, ResourceKind};
pub use flags::Flag;
pub use kubectl::KubectlCommand;

use crate::error::Result;

/// Capability set of one node in the command tree
pub trait Command: Sized {
    /// Name of this node
    fn name(&self) -> &str;

    /// One-line description, empty when the node has none
    fn summary(&self) -> &str {
        ""
    }

    /// Names of the available (non-hidden, non-deprecated) children
    fn sub_commands(&self) -> Vec<String>;

    /// Declared resource-type nouns accepted as the first positional argument
    fn resource_types(&self) -> Vec<String>;

    /// Available flags: own flags by name, then inherited flags by name
    fn flags(&self) -> Vec<Flag>;

    /// Split `args` and keep only the positional words
    fn non_flags(&self, args: &[String]) -> Vec<String>;

    /// Resolve `words` to the deepest matching node
    ///
    /// # Arguments
    /// * `words` - Argument words, command path first
    ///
    /// # Returns
    /// * `Result<(Self, Vec<String>)>` - The node and `words` with the
    ///   command path removed
    fn find(&self, words: &[String]) -> Result<(Self, Vec<String>)>;
}

/// Alias lookup for resource-type nouns
pub trait ResourceAliases {
    /// Every alias of every noun in `types`
    fn expand(&self, types: &[String]) -> Vec<String>;
}
