use std::sync::Arc;

use super::Command;
use super::catalog::Catalog;
use super::flags::{self, Flag};
use crate::error::{CommandError, Result};

/// A position in the kubectl command tree
///
/// Cheap to clone: the catalog is shared and only the node index is owned.
#[derive(Debug, Clone)]
pub struct KubectlCommand {
    catalog: Arc<Catalog>,
    index: usize,
}

impl KubectlCommand {
    /// Root of the catalog
    pub fn root(catalog: Arc<Catalog>) -> Self {
        let index = catalog.root();
        Self { catalog, index }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn at(&self, index: usize) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            index,
        }
    }

    /// Every flag this node accepts, hidden and deprecated ones included
    pub fn accepted_flags(&self) -> Vec<Flag> {
        self.catalog.all_flags(self.index)
    }

    fn is_root(&self) -> bool {
        self.index == self.catalog.root()
    }
}

impl Command for KubectlCommand {
    fn name(&self) -> &str {
        &self.catalog.node(self.index).name
    }

    fn summary(&self) -> &str {
        &self.catalog.node(self.index).short
    }

    fn sub_commands(&self) -> Vec<String> {
        self.catalog
            .node(self.index)
            .children
            .iter()
            .map(|&c| self.catalog.node(c))
            .filter(|node| node.is_available())
            .map(|node| node.name.clone())
            .collect()
    }

    fn resource_types(&self) -> Vec<String> {
        self.catalog.node(self.index).resource_types.clone()
    }

    fn flags(&self) -> Vec<Flag> {
        let node = self.catalog.node(self.index);
        let mut own: Vec<Flag> = node
            .flags
            .iter()
            .chain(&node.persistent_flags)
            .filter(|f| f.is_available())
            .cloned()
            .collect();
        let mut inherited: Vec<Flag> = self
            .catalog
            .inherited_flags(self.index)
            .into_iter()
            .filter(|f| f.is_available())
            .filter(|f| !own.iter().any(|o| o.name == f.name))
            .collect();
        // nearest declaration wins when an ancestor repeats a name
        inherited.sort_by(|a, b| a.name.cmp(&b.name));
        inherited.dedup_by(|a, b| a.name == b.name);

        own.sort_by(|a, b| a.name.cmp(&b.name));
        own.extend(inherited);
        own
    }

    fn non_flags(&self, args: &[String]) -> Vec<String> {
        flags::non_flags(args, &self.accepted_flags())
    }

    fn find(&self, words: &[String]) -> Result<(Self, Vec<String>)> {
        let mut index = self.index;
        let mut rest = words.to_vec();

        loop {
            let accepted = self.catalog.all_flags(index);
            let Some(&position) = flags::non_flag_positions(&rest, &accepted).first() else {
                break;
            };
            let Some(child) = self.catalog.child(index, &rest[position]) else {
                break;
            };
            rest.remove(position);
            index = child;
        }

        let found = self.at(index);
        if found.is_root() && !self.catalog.node(index).children.is_empty() {
            if let Some(word) = found.non_flags(&rest).into_iter().next() {
                return Err(CommandError::UnknownCommand {
                    command: word,
                    root: found.name().to_string(),
                }
                .into());
            }
        }

        Ok((found, rest))
    }
}
