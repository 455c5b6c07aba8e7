//! Completion engine - candidates for a partial kubectl line
//!
//! Given the line up to the cursor the engine decides what the word under
//! the cursor can be (a flag, a subcommand, a resource type or a resource
//! name), gathers candidates, and returns the suffixes that would complete
//! the word.

use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::context::{Context, implicit_type};
use crate::resource::ResourceFinder;

/// One completion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text to insert at the cursor
    pub suffix: String,
    /// Optional description for the candidate
    pub description: Option<String>,
}

impl Candidate {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            description: None,
        }
    }

    fn described(suffix: impl Into<String>, description: &str) -> Self {
        Self {
            suffix: suffix.into(),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

/// Candidates for the word under the cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResult {
    /// Candidates extending the typed word
    pub candidates: Vec<Candidate>,
    /// Length in bytes of the typed word the candidates extend
    pub replace_len: usize,
}

/// Main completion engine
pub struct CompletionEngine<C> {
    /// Root of the command tree
    root: C,
    /// Lookup for resource names, expected to be time-bounded
    finder: Arc<dyn ResourceFinder>,
}

impl<C: Command> CompletionEngine<C> {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `root` - Root of the command tree
    /// * `finder` - Resource finder for name candidates
    pub fn new(root: C, finder: Arc<dyn ResourceFinder>) -> Self {
        Self { root, finder }
    }

    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    /// * `context` - Current pin
    ///
    /// # Returns
    /// * `CompletionResult` - Suffixes to insert and the typed length they extend
    pub async fn complete(&self, line: &str, pos: usize, context: &Context) -> CompletionResult {
        let Some(line) = line.get(..pos) else {
            return CompletionResult::default();
        };

        // until the first blank the whole line is the word, at the root
        let (word, resolved) = if line.contains(' ') {
            (current_word(line), self.resolve(line))
        } else {
            (line, self.root.find(&[]).ok())
        };
        let Some((command, args)) = resolved else {
            return CompletionResult::default();
        };

        let candidates = self.candidates(word, &command, &args, context).await;
        format_candidates(word, candidates)
    }

    /// Usage line for the flag being assigned at the cursor
    ///
    /// Matches a line ending in `--name=`; anything else yields `None`.
    pub fn flag_usage(&self, line: &str, pos: usize) -> Option<String> {
        let name = assigned_flag(line.get(..pos)?)?;
        let (command, _) = self.resolve(line.get(..pos)?)?;
        command
            .flags()
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.usage_line())
    }

    /// Resolve the command under the cursor
    ///
    /// A trailing blank appends an empty argument: the previous word is
    /// finished, so "is a type already given" must count it.
    fn resolve(&self, line: &str) -> Option<(C, Vec<String>)> {
        let words: Vec<String> = line.split_whitespace().map(String::from).collect();
        match self.root.find(&words) {
            Ok((command, mut args)) => {
                if line.ends_with(' ') {
                    args.push(String::new());
                }
                Some((command, args))
            }
            Err(e) => {
                debug!("no completion for {:?}: {}", line, e);
                None
            }
        }
    }

    async fn candidates(
        &self,
        word: &str,
        command: &C,
        args: &[String],
        context: &Context,
    ) -> Vec<Candidate> {
        if word.starts_with('-') && !word.ends_with('=') {
            return command
                .flags()
                .iter()
                .map(|f| Candidate::new(f.completion()))
                .collect();
        }

        let sub_commands = command.sub_commands();
        if !sub_commands.is_empty() {
            return sub_commands
                .into_iter()
                .map(|name| {
                    let summary = command
                        .find(std::slice::from_ref(&name))
                        .map(|(sub, _)| sub.summary().to_string())
                        .unwrap_or_default();
                    Candidate::described(name + " ", &summary)
                })
                .collect();
        }

        let name = command.name();
        if let Some(resource_type) = implicit_type(name) {
            return self.resource_names(resource_type).await;
        }
        match name {
            "rolling-update" => self.resource_names("replicationcontrollers").await,
            "explain" => match self.root.find(&["get".to_string()]) {
                Ok((get, _)) => resource_types(&get),
                Err(_) => Vec::new(),
            },
            _ => {
                if let (1, Some(pinned)) = (context.len(), context.resource_type()) {
                    return self.resource_names(pinned).await;
                }
                let non_flags = command.non_flags(args);
                if non_flags.len() > 1 {
                    self.resource_names(&non_flags[0]).await
                } else {
                    resource_types(command)
                }
            }
        }
    }

    /// Names of the resources of one type, each followed by a blank
    async fn resource_names(&self, resource_type: &str) -> Vec<Candidate> {
        match self.finder.lookup(&[resource_type.to_string()]).await {
            Ok(resources) => resources
                .into_iter()
                .map(|r| Candidate::new(r.name + " "))
                .collect(),
            Err(e) => {
                debug!("resource lookup for {} failed: {}", resource_type, e);
                Vec::new()
            }
        }
    }
}

/// The word being completed: text after the last blank or comma
fn current_word(line: &str) -> &str {
    let start = line
        .rfind([' ', ','])
        .map(|i| i + 1)
        .unwrap_or(0);
    &line[start..]
}

/// Sorted, de-duplicated resource-type nouns, each followed by a blank
fn resource_types<C: Command>(command: &C) -> Vec<Candidate> {
    let mut types = command.resource_types();
    types.sort();
    types.dedup();
    types.into_iter().map(|t| Candidate::new(t + " ")).collect()
}

/// Name of the flag a line ends by assigning, as in `get --output=`
fn assigned_flag(line: &str) -> Option<&str> {
    let head = line.strip_suffix('=')?;
    let name = &head[head.rfind("--")? + 2..];
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '-');
    valid.then_some(name)
}

/// Keep candidates extending `word` and cut them down to what is missing
fn format_candidates(word: &str, candidates: Vec<Candidate>) -> CompletionResult {
    let mut result = CompletionResult::default();
    for mut candidate in candidates.into_iter().filter(|c| c.suffix.starts_with(word)) {
        if candidate.suffix.len() == word.len() {
            result.replace_len = candidate.suffix.len();
            candidate.suffix = " ".to_string();
        } else {
            result.replace_len = word.len();
            candidate.suffix = candidate.suffix[word.len()..].to_string();
        }
        result.candidates.push(candidate);
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::command::{Catalog, KubectlCommand};
    use crate::error::Result;
    use crate::resource::Resource;

    /// Resource names keyed by the exact type word asked for
    struct TestFinder(HashMap<&'static str, Vec<&'static str>>);

    #[async_trait]
    impl ResourceFinder for TestFinder {
        async fn lookup(&self, locator: &[String]) -> Result<Vec<Resource>> {
            let resource_type = locator[0].as_str();
            Ok(self
                .0
                .get(resource_type)
                .map(|names| {
                    names
                        .iter()
                        .map(|n| Resource::new(resource_type, *n))
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn engine() -> CompletionEngine<KubectlCommand> {
        let finder = TestFinder(HashMap::from([
            ("pod", vec!["p1", "p2"]),
            ("pods", vec!["web-1", "web-2"]),
            ("service", vec!["s1", "s2", "s3"]),
            ("nodes", vec!["n1"]),
        ]));
        let root = KubectlCommand::root(Arc::new(Catalog::kubesh().unwrap()));
        CompletionEngine::new(root, Arc::new(finder))
    }

    /// Completion with descriptions dropped, for comparing suffixes
    fn complete(line: &str, pos: usize, context: &Context) -> CompletionResult {
        let mut result = tokio_test::block_on(engine().complete(line, pos, context));
        for candidate in &mut result.candidates {
            candidate.description = None;
        }
        result
    }

    fn expect(replace_len: usize, candidates: &[&str]) -> CompletionResult {
        CompletionResult {
            candidates: candidates.iter().map(|c| Candidate::new(*c)).collect(),
            replace_len,
        }
    }

    #[test]
    fn test_complete_commands() {
        assert_eq!(complete("g", 1, &Context::Empty), expect(1, &["et "]));
        // deprecated rolling-update is not offered
        assert_eq!(complete("ro", 2, &Context::Empty), expect(2, &["llout "]));
    }

    #[test]
    fn test_complete_sub_commands() {
        assert_eq!(complete("create dep", 10, &Context::Empty), expect(3, &["loyment "]));
        assert_eq!(complete("create dep", 9, &Context::Empty), expect(2, &["ployment "]));
    }

    #[test]
    fn test_complete_resource_types() {
        assert_eq!(complete("get dep", 7, &Context::Empty), expect(3, &["loyments "]));
        assert_eq!(complete("get pod,dep", 11, &Context::Empty), expect(3, &["loyments "]));
    }

    #[test]
    fn test_complete_resources() {
        assert_eq!(complete("get pod p", 9, &Context::Empty), expect(1, &["1 ", "2 "]));
        assert_eq!(
            complete("get service ", 12, &Context::Empty),
            expect(0, &["s1 ", "s2 ", "s3 "])
        );
        assert_eq!(complete("get service s1", 14, &Context::Empty), expect(2, &[" "]));
    }

    #[test]
    fn test_complete_flags() {
        assert_eq!(
            complete("get --output", 12, &Context::Empty),
            expect(8, &["=", "-watch-events "])
        );
        assert_eq!(complete("get --output= pod", 13, &Context::Empty), expect(0, &[]));
    }

    #[test]
    fn test_complete_with_context() {
        let pinned = Context::Type("pod".into());
        assert_eq!(complete("get ", 4, &pinned), expect(0, &["p1 ", "p2 "]));

        let pinned = Context::Resource {
            resource_type: "pod".into(),
            name: "p1".into(),
        };
        assert_eq!(
            complete("get serv", 8, &pinned),
            expect(4, &["iceaccounts ", "ices "])
        );
    }

    #[test]
    fn test_complete_implicit_types() {
        assert_eq!(
            complete("logs ", 5, &Context::Empty),
            expect(0, &["web-1 ", "web-2 "])
        );
        assert_eq!(complete("drain ", 6, &Context::Empty), expect(0, &["n1 "]));
        assert_eq!(complete("explain dep", 11, &Context::Empty), expect(3, &["loyments "]));
    }

    #[test]
    fn test_redeclared_flag_offered_once() {
        assert_eq!(
            complete("config set-context --names", 26, &Context::Empty),
            expect(7, &["pace="])
        );
        assert_eq!(
            complete("create rolebinding --use", 24, &Context::Empty),
            expect(5, &["r="])
        );
    }

    #[test]
    fn test_sub_commands_carry_descriptions() {
        let result = tokio_test::block_on(engine().complete("ge", 2, &Context::Empty));
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(
            result.candidates[0].description.as_deref(),
            Some("Display one or many resources")
        );

        let result = tokio_test::block_on(engine().complete("get po", 6, &Context::Empty));
        assert!(result.candidates.iter().all(|c| c.description.is_none()));
    }

    #[test]
    fn test_unknown_command_has_no_candidates() {
        assert_eq!(complete("frob ", 5, &Context::Empty), expect(0, &[]));
    }

    #[test]
    fn test_exact_candidate_degenerates_to_blank() {
        let candidates = ["get ", "rollout ", "ro"].map(Candidate::new).to_vec();
        let result = format_candidates("ro", candidates);
        let suffixes: Vec<&str> = result.candidates.iter().map(|c| c.suffix.as_str()).collect();
        assert_eq!(suffixes, vec!["llout ", " "]);
        assert_eq!(result.replace_len, 2);
    }

    #[test]
    fn test_current_word() {
        assert_eq!(current_word("get po"), "po");
        assert_eq!(current_word("get pods,svc"), "svc");
        assert_eq!(current_word("get "), "");
        assert_eq!(current_word("get"), "get");
    }

    #[test]
    fn test_flag_usage() {
        let engine = engine();
        let line = "get --output=";
        assert_eq!(
            engine.flag_usage(line, line.len()).as_deref(),
            Some("  -o, --output=: Output format")
        );
        let line = "get -n default --namespace=";
        assert!(engine.flag_usage(line, line.len()).unwrap().contains("--namespace="));
        assert_eq!(engine.flag_usage("get --output", 12), None);
        assert_eq!(engine.flag_usage("get --bogus=", 12), None);
    }
}
