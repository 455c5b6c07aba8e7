//! Flag metadata and flag/non-flag splitting
//!
//! Splitting is a pure function over the argument list and the flag set of a
//! command node, so parsing one line never leaves state behind for the next.

use serde::Deserialize;

/// A command-line flag as declared in the command catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Flag {
    /// Long name without the leading dashes
    pub name: String,

    /// Single-character short form, if any
    #[serde(default)]
    pub shorthand: Option<String>,

    /// Whether the flag takes a value (`--name=value`)
    #[serde(default, rename = "value")]
    pub assignable: bool,

    /// One-line help text
    #[serde(default)]
    pub usage: String,

    #[serde(default)]
    pub hidden: bool,

    /// Deprecation notice; deprecated flags are still parsed but never offered
    #[serde(default)]
    pub deprecated: Option<String>,
}

impl Flag {
    /// Whether the flag should be shown to the user
    pub fn is_available(&self) -> bool {
        !self.hidden && self.deprecated.is_none()
    }

    /// Completion candidate for this flag: `--name=` or `--name `
    pub fn completion(&self) -> String {
        if self.assignable {
            format!("--{}=", self.name)
        } else {
            format!("--{} ", self.name)
        }
    }

    /// Help line in the usual pflag layout
    ///
    /// # Returns
    /// * `String` - `"  -o, --output=: usage"` or `"      --name: usage"`
    pub fn usage_line(&self) -> String {
        let assign = if self.assignable { "=" } else { "" };
        match &self.shorthand {
            Some(short) => format!("  -{}, --{}{}: {}", short, self.name, assign, self.usage),
            None => format!("      --{}{}: {}", self.name, assign, self.usage),
        }
    }

    fn matches_short(&self, ch: char) -> bool {
        self.shorthand
            .as_deref()
            .is_some_and(|s| s.chars().eq(std::iter::once(ch)))
    }
}

/// Positions of the non-flag words in `args`
///
/// Understands `--` (everything after it is positional), `--name=value`,
/// `--name value` for assignable flags, shorthand clusters (`-abc`) and
/// attached or detached shorthand values (`-nvalue`, `-n value`). Unknown
/// flags are treated as boolean switches. A lone `-` and the empty string are
/// positional.
///
/// # Arguments
/// * `args` - Words following the command path
/// * `flags` - Every flag the command accepts, hidden ones included
///
/// # Returns
/// * `Vec<usize>` - Indices into `args`, in order
pub fn non_flag_positions(args: &[String], flags: &[Flag]) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();
        i += 1;

        if arg == "--" {
            positions.extend(i..args.len());
            break;
        }

        if let Some(long) = arg.strip_prefix("--") {
            if !long.contains('=')
                && flags.iter().any(|f| f.name == long && f.assignable)
            {
                i += 1;
            }
            continue;
        }

        if let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) {
            for (offset, ch) in cluster.char_indices() {
                let Some(flag) = flags.iter().find(|f| f.matches_short(ch)) else {
                    continue;
                };
                if flag.assignable {
                    if cluster[offset + ch.len_utf8()..].is_empty() {
                        i += 1;
                    }
                    break;
                }
            }
            continue;
        }

        positions.push(i - 1);
    }

    positions
}

/// Whether a flag word names one of `flags`
///
/// `--name` and `--name=value` match on the long name. A shorthand cluster
/// matches when every letter up to the first assignable one is declared.
pub fn is_declared(arg: &str, flags: &[Flag]) -> bool {
    if let Some(long) = arg.strip_prefix("--") {
        let name = long.split_once('=').map_or(long, |(name, _)| name);
        return flags.iter().any(|f| f.name == name);
    }

    let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) else {
        return false;
    };
    for ch in cluster.chars() {
        match flags.iter().find(|f| f.matches_short(ch)) {
            Some(flag) if flag.assignable => return true,
            Some(_) => {}
            None => return false,
        }
    }
    true
}

/// The non-flag words of `args`, in order
pub fn non_flags(args: &[String], flags: &[Flag]) -> Vec<String> {
    non_flag_positions(args, flags)
        .into_iter()
        .map(|i| args[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(name: &str, short: Option<&str>, assignable: bool) -> Flag {
        Flag {
            name: name.to_string(),
            shorthand: short.map(str::to_string),
            assignable,
            usage: format!("{name} usage"),
            hidden: false,
            deprecated: None,
        }
    }

    fn sample() -> Vec<Flag> {
        vec![
            flag("namespace", Some("n"), true),
            flag("output", Some("o"), true),
            flag("watch", Some("w"), false),
            flag("all-namespaces", Some("A"), false),
        ]
    }

    fn split(line: &str) -> Vec<String> {
        let args: Vec<String> = line.split_whitespace().map(String::from).collect();
        non_flags(&args, &sample())
    }

    #[test]
    fn test_long_flags() {
        assert_eq!(split("get pods --output wide"), vec!["get", "pods"]);
        assert_eq!(split("get --output=wide pods"), vec!["get", "pods"]);
        assert_eq!(split("get --watch pods"), vec!["get", "pods"]);
    }

    #[test]
    fn test_shorthand_values() {
        assert_eq!(split("get -n kube-system pods"), vec!["get", "pods"]);
        assert_eq!(split("get -nkube-system pods"), vec!["get", "pods"]);
        assert_eq!(split("get -wA pods"), vec!["get", "pods"]);
        assert_eq!(split("get -wn default pods"), vec!["get", "pods"]);
    }

    #[test]
    fn test_unknown_flags_are_switches() {
        assert_eq!(split("get --frob pods"), vec!["get", "pods"]);
        assert_eq!(split("get -z pods"), vec!["get", "pods"]);
    }

    #[test]
    fn test_double_dash_and_lone_dash() {
        assert_eq!(split("exec p1 -- ls -l"), vec!["exec", "p1", "ls", "-l"]);
        assert_eq!(split("apply -"), vec!["apply", "-"]);
        assert_eq!(non_flags(&[String::new()], &sample()), vec![""]);
    }

    #[test]
    fn test_is_declared() {
        let flags = sample();
        assert!(is_declared("--namespace", &flags));
        assert!(is_declared("--output=wide", &flags));
        assert!(is_declared("-wA", &flags));
        assert!(is_declared("-nkube-system", &flags));
        assert!(!is_declared("--frob", &flags));
        assert!(!is_declared("-wz", &flags));
        assert!(!is_declared("-", &flags));
        assert!(!is_declared("pods", &flags));
    }

    #[test]
    fn test_positions() {
        let args: Vec<String> = ["-n", "x", "get", "pods"].map(String::from).to_vec();
        assert_eq!(non_flag_positions(&args, &sample()), vec![2, 3]);
    }

    #[test]
    fn test_usage_line() {
        assert_eq!(
            flag("output", Some("o"), true).usage_line(),
            "  -o, --output=: output usage"
        );
        assert_eq!(flag("watch", None, false).usage_line(), "      --watch: watch usage");
    }

    #[test]
    fn test_completion_form() {
        assert_eq!(flag("output", Some("o"), true).completion(), "--output=");
        assert_eq!(flag("watch", None, false).completion(), "--watch ");
    }
}
