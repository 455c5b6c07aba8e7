//! Embedded kubectl command catalog
//!
//! The catalog is read once from TOML into a flat, immutable arena of
//! command nodes. Nodes refer to their parent and children by index.

use serde::Deserialize;

use super::flags::Flag;
use super::ResourceAliases;
use crate::error::{CommandError, Result};

/// Catalog source shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

/// Shell-internal command that pins a resource
pub const PIN_COMMAND: &str = "pin";

/// Shell-internal command that leaves the REPL
pub const EXIT_COMMAND: &str = "exit";

/// A resource type known to the shell
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceKind {
    /// Canonical plural noun, e.g. `pods`
    pub name: String,

    /// API kind, e.g. `Pod`
    pub kind: String,

    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    root: String,
    #[serde(default)]
    persistent_flags: Vec<Flag>,
    #[serde(default)]
    resources: Vec<ResourceKind>,
    #[serde(default)]
    commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CommandSpec {
    path: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    short: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    deprecated: Option<String>,
    #[serde(default)]
    all_resource_types: bool,
    #[serde(default)]
    resource_types: Vec<String>,
    #[serde(default)]
    flags: Vec<Flag>,
    #[serde(default)]
    persistent_flags: Vec<Flag>,
}

/// One node of the command tree
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: String,
    pub aliases: Vec<String>,
    pub short: String,
    pub hidden: bool,
    pub deprecated: Option<String>,
    /// Declared first-positional resource nouns, sorted
    pub resource_types: Vec<String>,
    /// Flags local to this node
    pub flags: Vec<Flag>,
    /// Flags inherited by every descendant
    pub persistent_flags: Vec<Flag>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl CommandNode {
    fn new(name: &str, parent: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            short: String::new(),
            hidden: false,
            deprecated: None,
            resource_types: Vec::new(),
            flags: Vec::new(),
            persistent_flags: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    /// Whether the node is listed among its parent's subcommands
    pub fn is_available(&self) -> bool {
        !self.hidden && self.deprecated.is_none()
    }

    fn answers_to(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|a| a == word)
    }
}

/// Immutable command tree plus resource table
#[derive(Debug, Clone)]
pub struct Catalog {
    nodes: Vec<CommandNode>,
    resources: Vec<ResourceKind>,
}

impl Catalog {
    /// The kubectl catalog with the shell's own commands installed
    ///
    /// # Returns
    /// * `Result<Self>` - Catalog or [`CommandError::InvalidCatalog`]
    pub fn kubesh() -> Result<Self> {
        let mut catalog = Self::from_toml(BUILTIN_CATALOG)?;
        catalog.install_shell_commands();
        Ok(catalog)
    }

    /// Parse a catalog from TOML source
    ///
    /// # Arguments
    /// * `source` - Catalog document
    ///
    /// # Returns
    /// * `Result<Self>` - Catalog or [`CommandError::InvalidCatalog`]
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| CommandError::InvalidCatalog(e.to_string()))?;

        let mut root = CommandNode::new(&file.root, None);
        root.persistent_flags = file.persistent_flags;

        let mut catalog = Self {
            nodes: vec![root],
            resources: file.resources,
        };

        for spec in file.commands {
            catalog.insert(spec)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, spec: CommandSpec) -> Result<usize> {
        let mut words: Vec<&str> = spec.path.split_whitespace().collect();
        let name = words
            .pop()
            .ok_or_else(|| CommandError::InvalidCatalog("command with empty path".into()))?;

        let mut parent = self.root();
        for word in words {
            parent = self
                .nodes[parent]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c].name == word)
                .ok_or_else(|| {
                    CommandError::InvalidCatalog(format!(
                        "'{}' is listed before its parent '{}'",
                        spec.path, word
                    ))
                })?;
        }

        let mut resource_types = spec.resource_types;
        if spec.all_resource_types {
            resource_types.extend(self.resources.iter().map(|r| r.name.clone()));
        }
        resource_types.sort();
        resource_types.dedup();

        let mut node = CommandNode::new(name, Some(parent));
        node.aliases = spec.aliases;
        node.short = spec.short;
        node.hidden = spec.hidden;
        node.deprecated = spec.deprecated;
        node.resource_types = resource_types;
        node.flags = spec.flags;
        node.persistent_flags = spec.persistent_flags;

        let index = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(index);
        Ok(index)
    }

    fn install_shell_commands(&mut self) {
        let root = self.root();
        let nouns = self
            .child(root, "get")
            .map(|get| self.nodes[get].resource_types.clone())
            .unwrap_or_else(|| self.resources.iter().map(|r| r.name.clone()).collect());

        let mut pin = CommandNode::new(PIN_COMMAND, Some(root));
        pin.short = "Pin a resource type or resource for subsequent commands".into();
        pin.resource_types = nouns;
        pin.flags = vec![
            Flag {
                name: "clear".into(),
                shorthand: Some("c".into()),
                assignable: false,
                usage: "Clears pinned resource".into(),
                hidden: false,
                deprecated: None,
            },
            Flag {
                name: "help".into(),
                shorthand: Some("h".into()),
                assignable: false,
                usage: "help for pin".into(),
                hidden: false,
                deprecated: None,
            },
        ];

        let mut exit = CommandNode::new(EXIT_COMMAND, Some(root));
        exit.short = "Exit kubesh".into();

        for node in [pin, exit] {
            let index = self.nodes.len();
            self.nodes.push(node);
            self.nodes[root].children.push(index);
        }
    }

    /// Index of the root node
    pub fn root(&self) -> usize {
        0
    }

    pub fn node(&self, index: usize) -> &CommandNode {
        &self.nodes[index]
    }

    /// Child of `index` named or aliased `word`
    pub fn child(&self, index: usize, word: &str) -> Option<usize> {
        self.nodes[index]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].answers_to(word))
    }

    /// Persistent flags declared on the ancestors of `index`, nearest first
    pub fn inherited_flags(&self, index: usize) -> Vec<Flag> {
        let mut flags = Vec::new();
        let mut current = self.nodes[index].parent;
        while let Some(parent) = current {
            flags.extend(self.nodes[parent].persistent_flags.iter().cloned());
            current = self.nodes[parent].parent;
        }
        flags
    }

    /// Every flag `index` accepts, unavailable ones included
    pub fn all_flags(&self, index: usize) -> Vec<Flag> {
        let node = &self.nodes[index];
        let mut flags = node.flags.clone();
        flags.extend(node.persistent_flags.iter().cloned());
        flags.extend(self.inherited_flags(index));
        flags
    }

    pub fn resources(&self) -> &[ResourceKind] {
        &self.resources
    }

    /// Canonical plural noun for a name, alias or kind
    ///
    /// # Arguments
    /// * `word` - Anything a user or the API might call the type
    ///
    /// # Returns
    /// * `Option<&str>` - Canonical noun if the type is known
    pub fn canonical_type(&self, word: &str) -> Option<&str> {
        self.resources
            .iter()
            .find(|r| r.name == word || r.aliases.iter().any(|a| a == word) || r.kind == word)
            .map(|r| r.name.as_str())
    }
}

impl ResourceAliases for Catalog {
    fn expand(&self, types: &[String]) -> Vec<String> {
        self.resources
            .iter()
            .filter(|r| types.contains(&r.name))
            .flat_map(|r| r.aliases.iter().cloned())
            .collect()
    }
}
