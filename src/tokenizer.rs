//! Input tokenizer for the shell.
//!
//! This module turns a raw input line into tokens, respecting shell quoting
//! rules and escape sequences. Quoted and unquoted runs that touch each other
//! form a single token, so `'foo'bar"baz"` is one word.

use crate::error::MalformedQuoting;

// --- Constants ---
pub const BACKSLASH: char = '\\';
pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';

/// One logical word after quote removal and escape resolution.
pub type Token = String;

/// Result of scanning a line: the tokens plus any quoting problem seen at end
/// of input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scan {
    pub tokens: Vec<Token>,
    pub malformed: Option<MalformedQuoting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

/// Characters a backslash escapes inside double quotes. Anywhere else in
/// double quotes the backslash is kept literally.
fn escapes_in_double_quotes(c: char) -> bool {
    matches!(c, '$' | '`' | BACKSLASH | DOUBLE_QUOTE | '\n')
}

/// Unquoted characters that end a token.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// Lexer state for a single call to [`scan`]. Never outlives it.
struct Lexer {
    quoting: Quoting,
    escape_pending: bool,
    current: String,
    // Set once a quote opens, so `''` still yields an (empty) token.
    quoted: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new() -> Self {
        Self {
            quoting: Quoting::Unquoted,
            escape_pending: false,
            current: String::new(),
            quoted: false,
            tokens: Vec::new(),
        }
    }

    fn finish_token(&mut self) {
        if self.quoted || !self.current.is_empty() {
            self.tokens.push(std::mem::take(&mut self.current));
        }
        self.quoted = false;
    }

    fn run(mut self, line: &str) -> Scan {
        let mut chars = line.chars().peekable();
        let mut malformed = None;

        while let Some(c) = chars.next() {
            if self.escape_pending {
                self.current.push(c);
                self.escape_pending = false;
                continue;
            }

            match (self.quoting, c) {
                (Quoting::SingleQuoted, SINGLE_QUOTE) => self.quoting = Quoting::Unquoted,
                // Everything else is literal inside single quotes, backslash included.
                (Quoting::SingleQuoted, _) => self.current.push(c),

                (Quoting::DoubleQuoted, DOUBLE_QUOTE) => self.quoting = Quoting::Unquoted,
                (Quoting::DoubleQuoted, BACKSLASH) => {
                    if chars.peek().is_some_and(|&next| escapes_in_double_quotes(next)) {
                        self.escape_pending = true;
                    } else {
                        self.current.push(c);
                    }
                }
                (Quoting::DoubleQuoted, _) => self.current.push(c),

                (Quoting::Unquoted, SINGLE_QUOTE) => {
                    self.quoting = Quoting::SingleQuoted;
                    self.quoted = true;
                }
                (Quoting::Unquoted, DOUBLE_QUOTE) => {
                    self.quoting = Quoting::DoubleQuoted;
                    self.quoted = true;
                }
                (Quoting::Unquoted, BACKSLASH) => {
                    if chars.peek().is_some() {
                        self.escape_pending = true;
                    } else {
                        // Backslash at end of input - keep it literally
                        self.current.push(c);
                        malformed = Some(MalformedQuoting::DanglingEscape);
                    }
                }
                (Quoting::Unquoted, c) if is_separator(c) => self.finish_token(),
                (Quoting::Unquoted, _) => self.current.push(c),
            }
        }

        match self.quoting {
            Quoting::SingleQuoted => malformed = Some(MalformedQuoting::UnterminatedSingleQuote),
            Quoting::DoubleQuoted => malformed = Some(MalformedQuoting::UnterminatedDoubleQuote),
            Quoting::Unquoted => {}
        }

        // Unterminated quotes still flush what was collected
        self.finish_token();

        Scan {
            tokens: self.tokens,
            malformed,
        }
    }
}

/// Scans a line into tokens and reports malformed quoting, if any.
///
/// Never fails: unterminated quotes and a trailing backslash produce a
/// best-effort token list.
pub fn scan(line: &str) -> Scan {
    Lexer::new().run(line)
}

/// Splits a command line into tokens, respecting shell quoting and escaping.
///
/// # Examples
///
/// ```
/// use minish::tokenizer::tokenize;
///
/// assert_eq!(tokenize(r#"echo 'a b' "c"d"#), vec!["echo", "a b", "cd"]);
/// ```
pub fn tokenize(line: &str) -> Vec<Token> {
    scan(line).tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_parsing() {
        assert_eq!(tokenize("echo hello world"), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_unquoted_matches_whitespace_split() {
        for line in ["", "   ", "ls", "  ls   -la\t/tmp  ", "a\tb  c\nd"] {
            let expected: Vec<&str> = line.split_ascii_whitespace().collect();
            assert_eq!(tokenize(line), expected, "line: {line:?}");
        }
    }

    #[test]
    fn test_only_blanks_separate() {
        assert_eq!(tokenize("a\u{a0}b"), vec!["a\u{a0}b"]);
        assert_eq!(tokenize("a\u{3000}b c"), vec!["a\u{3000}b", "c"]);
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(tokenize("'a b' c"), vec!["a b", "c"]);
        assert_eq!(tokenize(r#"'say "hi" \n'"#), vec![r#"say "hi" \n"#]);
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(tokenize("\"a b\" c"), vec!["a b", "c"]);
        assert_eq!(tokenize(r#""it's""#), vec!["it's"]);
    }

    #[test]
    fn test_adjacent_segments_merge() {
        assert_eq!(tokenize("'it''s'"), vec!["its"]);
        assert_eq!(tokenize(r#"'foo'bar"baz""#), vec!["foobarbaz"]);
        assert_eq!(tokenize(r#"echo a"b c"d 'e'"#), vec!["echo", "ab cd", "e"]);
    }

    #[test]
    fn test_backslash_escape_unquoted() {
        assert_eq!(tokenize(r"a\ b"), vec!["a b"]);
        assert_eq!(tokenize(r"\'x\'"), vec!["'x'"]);
        assert_eq!(tokenize(r"a\\b"), vec![r"a\b"]);
        assert_eq!(tokenize(r"\n"), vec!["n"]);
    }

    #[test]
    fn test_backslash_escape_in_double_quotes() {
        assert_eq!(tokenize(r#""a\"b""#), vec![r#"a"b"#]);
        assert_eq!(tokenize(r#""a\\b""#), vec![r"a\b"]);
        assert_eq!(tokenize(r#""\$HOME""#), vec!["$HOME"]);
        assert_eq!(tokenize("\"a\\`b\""), vec!["a`b"]);
        assert_eq!(tokenize("\"a\\\nb\""), vec!["a\nb"]);
    }

    #[test]
    fn test_backslash_literal_before_ordinary_char_in_double_quotes() {
        assert_eq!(tokenize(r#""a\nb""#), vec![r"a\nb"]);
        assert_eq!(tokenize(r#""a\'b""#), vec![r"a\'b"]);
    }

    #[test]
    fn test_backslash_literal_in_single_quotes() {
        assert_eq!(tokenize(r"'a\'b'"), vec![r"a\b"]);
    }

    #[test]
    fn test_quoted_whitespace_is_content() {
        assert_eq!(tokenize("echo '  x  '  y"), vec!["echo", "  x  ", "y"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(tokenize("''"), vec![""]);
        assert_eq!(tokenize(r#"echo "" x"#), vec!["echo", "", "x"]);
        assert_eq!(tokenize("a''"), vec!["a"]);
    }

    #[test]
    fn test_unterminated_quotes_flush() {
        let scanned = scan("echo 'hello wor");
        assert_eq!(scanned.tokens, vec!["echo", "hello wor"]);
        assert_eq!(scanned.malformed, Some(MalformedQuoting::UnterminatedSingleQuote));

        let scanned = scan(r#"echo "a b"#);
        assert_eq!(scanned.tokens, vec!["echo", "a b"]);
        assert_eq!(scanned.malformed, Some(MalformedQuoting::UnterminatedDoubleQuote));
    }

    #[test]
    fn test_dangling_escape() {
        let scanned = scan(r"echo a\");
        assert_eq!(scanned.tokens, vec!["echo", r"a\"]);
        assert_eq!(scanned.malformed, Some(MalformedQuoting::DanglingEscape));

        let scanned = scan(r#""a\"#);
        assert_eq!(scanned.tokens, vec![r"a\"]);
        assert_eq!(scanned.malformed, Some(MalformedQuoting::UnterminatedDoubleQuote));
    }

    #[test]
    fn test_well_formed_input_has_no_diagnostic() {
        assert_eq!(scan(r#"echo 'x' "y" z\ w"#).malformed, None);
    }

    #[test]
    fn test_retokenizing_plain_token_is_stable() {
        for word in ["hello", "a-b_c", "/usr/bin/env"] {
            let once = tokenize(word);
            assert_eq!(once, vec![word]);
            assert_eq!(tokenize(&once[0]), once);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(tokenize("   "), Vec::<String>::new());
    }
}
