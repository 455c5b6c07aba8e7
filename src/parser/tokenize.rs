//! Shell-style word splitting for REPL input
//!
//! Splits a raw line into argument words the way a POSIX shell would for the
//! narrow subset kubesh supports: single and double quotes, backslash escapes
//! and blank-separated words. There is no globbing, expansion or redirection.
//!
//! Escape rules, which completion offsets and context injection depend on:
//!
//! - `\\` yields a literal backslash.
//! - `\` before the quote character of the region it is in yields that quote
//!   without the backslash; before any other quote the backslash is kept.
//! - `\` before a blank outside quotes joins the blank into the word; inside
//!   quotes the backslash is kept.
//! - `\` before any other character is kept along with the character.

use crate::error::ParseError;

/// Scanner state for a single line
struct Tokenizer {
    /// Completed words
    tokens: Vec<String>,
    /// Word being accumulated
    current: String,
    /// Open quote character, if inside a quoted region
    quote: Option<char>,
    /// Previous character was an unconsumed backslash
    escape: bool,
}

impl Tokenizer {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            current: String::new(),
            quote: None,
            escape: false,
        }
    }

    /// Feed one character through the state machine
    fn push(&mut self, ch: char) {
        let mut keep_backslash = false;
        let mut keep_char = true;
        let mut end_word = false;

        match ch {
            '\\' => {
                keep_char = self.escape;
                self.escape = !self.escape;
            }
            '\'' | '"' => {
                keep_char = false;
                if self.escape {
                    keep_backslash = self.quote != Some(ch);
                    keep_char = true;
                } else if let Some(open) = self.quote {
                    if open == ch {
                        self.quote = None;
                    } else {
                        keep_char = true;
                    }
                } else {
                    self.quote = Some(ch);
                }
                self.escape = false;
            }
            ' ' | '\t' => {
                keep_char = self.escape;
                if self.quote.is_some() {
                    keep_backslash = self.escape;
                    keep_char = true;
                } else {
                    end_word = !self.escape && !self.current.is_empty();
                }
                self.escape = false;
            }
            _ => {
                keep_backslash = self.escape;
                self.escape = false;
            }
        }

        if keep_backslash {
            self.current.push('\\');
        }
        if keep_char {
            self.current.push(ch);
        }
        if end_word {
            self.tokens.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Result<Vec<String>, ParseError> {
        if self.quote.is_some() {
            return Err(ParseError::UnterminatedQuote {
                tokens: self.tokens,
            });
        }
        if !self.current.is_empty() {
            self.tokens.push(self.current);
        }
        Ok(self.tokens)
    }
}

/// Split a line into argument words
///
/// # Arguments
/// * `line` - Raw input line
///
/// # Returns
/// * `Result<Vec<String>, ParseError>` - Words in order, or
///   [`ParseError::UnterminatedQuote`] carrying the words completed before the
///   unclosed quote
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokenizer = Tokenizer::new();
    for ch in line.chars() {
        tokenizer.push(ch);
    }
    tokenizer.finish()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(words("abc"), vec!["abc"]);
        assert_eq!(words("ab c"), vec!["ab", "c"]);
        assert_eq!(words("a  \t b"), vec!["a", "b"]);
        assert!(words("").is_empty());
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_escaped_blank_joins_word() {
        assert_eq!(words("ab\\ c"), vec!["ab c"]);
    }

    #[test]
    fn test_carriage_return_is_literal() {
        assert_eq!(words("ab\rc"), vec!["ab\rc"]);
    }

    #[test]
    fn test_quoted_regions() {
        assert_eq!(words("ab 'c'"), vec!["ab", "c"]);
        assert_eq!(words("ab 'c d'"), vec!["ab", "c d"]);
        assert_eq!(words("ab -x='c d'"), vec!["ab", "-x=c d"]);
        assert_eq!(words(r#"ab -x="c d""#), vec!["ab", "-x=c d"]);
    }

    #[test]
    fn test_other_quote_is_literal_inside_quotes() {
        assert_eq!(words(r#"say "can't""#), vec!["say", "can't"]);
        assert_eq!(words(r#"say 'a "b" c'"#), vec!["say", "a \"b\" c"]);
    }

    #[test]
    fn test_escaped_quotes() {
        // escaping the open quote's own delimiter drops the backslash
        assert_eq!(words(r"ab '\'c'"), vec!["ab", "'c"]);
        assert_eq!(words(r#"ab "\"c""#), vec!["ab", "\"c"]);
        // escaping the other quote keeps it
        assert_eq!(words(r#"ab "\'c""#), vec!["ab", "\\'c"]);
    }

    #[test]
    fn test_backslashes() {
        assert_eq!(words(r"a\\b"), vec![r"a\b"]);
        assert_eq!(words(r"a\b"), vec![r"a\b"]);
        assert_eq!(words(r"'a\ b'"), vec![r"a\ b"]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("a \"c").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedQuote {
                tokens: vec!["a".to_string()]
            }
        );
        assert!(tokenize("a b \"c").is_err());
    }

    #[test]
    fn test_tab_inside_quotes_is_literal() {
        assert_eq!(words("a 'b\tc'"), vec!["a", "b\tc"]);
        assert_eq!(words("a \"b\t\tc\" d"), vec!["a", "b\t\tc", "d"]);
    }

    proptest! {
        /// Words with nothing to quote or escape survive a join and re-split.
        #[test]
        fn test_retokenize_plain_words(
            ws in prop::collection::vec("[a-zA-Z0-9=._/:,-]{1,12}", 0..8),
            sep in "[ \t]{1,3}",
        ) {
            let first = words(&ws.join(&sep));
            prop_assert_eq!(&first, &ws);
            prop_assert_eq!(words(&first.join(" ")), ws);
        }
    }
}
