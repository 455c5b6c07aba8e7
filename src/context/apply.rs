use std::collections::HashSet;

use super::Context;
use crate::command::{Command, ResourceAliases};
use crate::error::Result;

/// Resource type implied by commands that take a bare resource name
///
/// # Arguments
/// * `command` - Subcommand name
///
/// # Returns
/// * `Option<&'static str>` - Canonical noun, if `command` takes a bare name
pub fn implicit_type(command: &str) -> Option<&'static str> {
    match command {
        "attach" | "exec" | "logs" | "port-forward" => Some("pods"),
        "cordon" | "drain" | "uncordon" => Some("nodes"),
        _ => None,
    }
}

/// Inject the pinned context into an argument list
///
/// The first word is resolved against `root`. If that command takes a
/// resource locator and the user left it out, the pinned type and name are
/// spliced in right after the command word. Flags and trailing words are
/// kept in order.
///
/// # Arguments
/// * `context` - Current pin
/// * `args` - Tokenized line
/// * `root` - Root of the command tree
/// * `aliases` - Alias table used to widen the command's type vocabulary
///
/// # Returns
/// * `Result<Vec<String>>` - Rewritten arguments, or the error from resolving
///   the command; callers then fall back to `args` unchanged
pub fn apply_context<C, A>(
    context: &Context,
    args: &[String],
    root: &C,
    aliases: &A,
) -> Result<Vec<String>>
where
    C: Command,
    A: ResourceAliases + ?Sized,
{
    let Some((first, rest)) = args.split_first() else {
        return Ok(Vec::new());
    };
    let Some(pinned_type) = context.resource_type() else {
        return Ok(args.to_vec());
    };

    let (command, _) = root.find(std::slice::from_ref(first))?;

    let declared = command.resource_types();
    let mut vocabulary: HashSet<String> = aliases.expand(&declared).into_iter().collect();
    vocabulary.extend(declared);

    let mut rewritten = vec![first.clone()];

    if vocabulary.is_empty() {
        if implicit_type(first) == Some(pinned_type) {
            rewritten.extend(context.name().map(str::to_string));
        }
        if first == "top" && matches!(pinned_type, "pods" | "nodes") {
            rewritten.push(pinned_type.to_string());
        }
    } else if vocabulary.contains(pinned_type) {
        // the command word itself is always one of the non-flags
        let non_flags = command.non_flags(args);
        match non_flags.len() {
            1 => rewritten.extend(context.parts()),
            2 if !vocabulary.contains(&non_flags[1]) => rewritten.push(pinned_type.to_string()),
            _ => {}
        }
    }

    rewritten.extend(rest.iter().cloned());
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::command::{Catalog, Flag, KubectlCommand};
    use crate::error::{CommandError, KubeshError};

    fn words(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn context(line: &str) -> Context {
        Context::from_parts(&words(line)).unwrap()
    }

    fn apply(pin: &str, line: &str) -> Vec<String> {
        let catalog = Arc::new(Catalog::kubesh().unwrap());
        let root = KubectlCommand::root(Arc::clone(&catalog));
        apply_context(&context(pin), &words(line), &root, catalog.as_ref()).unwrap()
    }

    /// A command tree that cannot resolve anything
    struct BrokenTree;

    impl Command for BrokenTree {
        fn name(&self) -> &str {
            "broken"
        }
        fn sub_commands(&self) -> Vec<String> {
            Vec::new()
        }
        fn resource_types(&self) -> Vec<String> {
            Vec::new()
        }
        fn flags(&self) -> Vec<Flag> {
            Vec::new()
        }
        fn non_flags(&self, args: &[String]) -> Vec<String> {
            args.to_vec()
        }
        fn find(&self, words: &[String]) -> Result<(Self, Vec<String>)> {
            Err(CommandError::UnknownCommand {
                command: words.first().cloned().unwrap_or_default(),
                root: "broken".into(),
            }
            .into())
        }
    }

    struct NoAliases;

    impl ResourceAliases for NoAliases {
        fn expand(&self, _types: &[String]) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_empty_args() {
        assert!(apply("pods p1", "").is_empty());
    }

    #[test]
    fn test_empty_context_is_identity() {
        assert_eq!(apply("", "get pods -o wide"), words("get pods -o wide"));
    }

    #[test]
    fn test_appends_full_context() {
        assert_eq!(apply("pods p1", "get"), words("get pods p1"));
        assert_eq!(apply("pods", "describe"), words("describe pods"));
    }

    #[test]
    fn test_context_goes_before_flags() {
        assert_eq!(apply("pods p1", "get -o yaml"), words("get pods p1 -o yaml"));
        assert_eq!(
            apply("pods", "get -n kube-system"),
            words("get pods -n kube-system")
        );
    }

    #[test]
    fn test_second_word_is_a_type() {
        assert_eq!(apply("services", "get services"), words("get services"));
        // aliases count as types
        assert_eq!(apply("pods", "get svc"), words("get svc"));
    }

    #[test]
    fn test_second_word_is_a_name() {
        assert_eq!(apply("pods", "get p1"), words("get pods p1"));
        assert_eq!(apply("pods p1", "delete p2"), words("delete pods p2"));
    }

    #[test]
    fn test_full_locator_is_untouched() {
        assert_eq!(apply("pods p1", "get services s1"), words("get services s1"));
    }

    #[test]
    fn test_type_outside_vocabulary() {
        assert_eq!(apply("nodes n1", "scale"), words("scale"));
    }

    #[test]
    fn test_name_scoped_commands() {
        assert_eq!(apply("pods p1", "logs"), words("logs p1"));
        assert_eq!(apply("pods p1", "exec -it -- sh"), words("exec p1 -it -- sh"));
        assert_eq!(apply("nodes n1", "drain --force"), words("drain n1 --force"));
        // wrong type or no name
        assert_eq!(apply("services s1", "logs"), words("logs"));
        assert_eq!(apply("pods", "logs"), words("logs"));
    }

    #[test]
    fn test_top_takes_pinned_type() {
        assert_eq!(apply("pods", "top"), words("top pods"));
        assert_eq!(apply("nodes n1", "top"), words("top nodes"));
        assert_eq!(apply("services", "top"), words("top"));
    }

    #[test]
    fn test_resolution_error_is_returned() {
        let result = apply_context(&context("pods"), &words("get"), &BrokenTree, &NoAliases);
        assert!(matches!(result, Err(KubeshError::Command(_))));
    }

    #[test]
    fn test_unknown_command_errors() {
        let catalog = Arc::new(Catalog::kubesh().unwrap());
        let root = KubectlCommand::root(Arc::clone(&catalog));
        let result = apply_context(&context("pods"), &words("frob"), &root, catalog.as_ref());
        assert!(result.is_err());
    }
}
