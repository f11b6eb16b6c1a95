//! Markdown lexical grammar.
//!
//! A [`Grammar`] is an ordered list of [`Rule`]s. Each rule names a token
//! type and owns one or more [`Pattern`]s which are tried in order. A pattern
//! may carry an inside-grammar that tokenizes the matched text again, which
//! is how bold text ends up with punctuation tokens around its content.
//!
//! Grammars are plain values: built once, shared by reference, never
//! mutated. Nested constructs (italic inside bold, bold inside italic) are
//! built by composing rule constructors, so the nesting depth is fixed by
//! construction instead of by self-reference.

use std::ops::Range;
use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use smol_str::SmolStr;

/// Name of the capture group that delimits the token inside a match.
///
/// Text matched outside this group is context: it must be present for the
/// pattern to apply, but stays in the neighbouring plain fragments. This
/// covers both "lookbehind" prefixes and "lookahead" suffixes.
pub const BODY_GROUP: &str = "body";

/// Any character except line terminators.
const DOT: &str = r"[^\n\r\x{2028}\x{2029}]";

/// Error building a grammar from pattern source.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum GrammarError {
    #[error("invalid token pattern `{pattern}`")]
    #[diagnostic(
        code(mazimo::grammar::pattern),
        help("patterns use `regex` crate syntax; lookaround and backreferences are not supported")
    )]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Extra condition a match must satisfy after the regex accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Guard {
    #[default]
    None,
    /// Reject bodies spanning an empty line (two consecutive line breaks).
    NoBlankLine,
}

impl Guard {
    fn accepts(self, body: &str) -> bool {
        match self {
            Guard::None => true,
            Guard::NoBlankLine => {
                !(body.contains("\n\n") || body.contains("\n\r") || body.contains("\r\r"))
            }
        }
    }
}

/// A single compiled matcher for a rule.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    guard: Guard,
    inside: Option<Grammar>,
}

impl Pattern {
    /// Compile a pattern. If the source has a `body` group, only that group
    /// becomes the token.
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(source).map_err(|source_err| GrammarError::Pattern {
            pattern: source.to_owned(),
            source: source_err,
        })?;
        Ok(Self {
            regex,
            guard: Guard::None,
            inside: None,
        })
    }

    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Tokenize matched text with `grammar` instead of keeping it as one string.
    pub fn with_inside(mut self, grammar: Grammar) -> Self {
        self.inside = Some(grammar);
        self
    }

    pub fn inside(&self) -> Option<&Grammar> {
        self.inside.as_ref()
    }

    /// Find the leftmost token in `text`, as a byte range.
    ///
    /// A match rejected by the guard is retried one character past its
    /// start, the same way a backtracking engine would move on.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        let mut start = 0;
        while start <= text.len() {
            let caps = self.regex.captures_at(text, start)?;
            let whole = caps.get(0)?;
            let body = caps.name(BODY_GROUP).unwrap_or(whole);
            if !body.is_empty() && self.guard.accepts(body.as_str()) {
                return Some(body.range());
            }
            start = whole.start()
                + text[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        None
    }
}

/// A named token type and the patterns producing it.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: SmolStr,
    alias: Option<SmolStr>,
    patterns: Vec<Pattern>,
}

impl Rule {
    pub fn new(kind: impl Into<SmolStr>) -> Self {
        Self {
            kind: kind.into(),
            alias: None,
            patterns: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<SmolStr>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn kind(&self) -> &SmolStr {
        &self.kind
    }

    pub fn alias(&self) -> Option<&SmolStr> {
        self.alias.as_ref()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// Ordered token rules. Earlier rules win.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, kind: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build the markdown grammar used for live highlighting.
    pub fn markdown() -> Result<Self, GrammarError> {
        Ok(Grammar::builder()
            .rule(
                Rule::new("blockquote")
                    .with_alias("punctuation")
                    .with_pattern(Pattern::new(r"(?m)^>(?:[\t ]*>)*")?),
            )
            .rule(
                Rule::new("code")
                    .with_alias("keyword")
                    .with_pattern(Pattern::new(&format!(r"(?m)^(?: {{4}}|\t){DOT}+"))?)
                    .with_pattern(Pattern::new(&format!(r"``{DOT}+?``|`[^`\n]+`"))?),
            )
            .rule(
                Rule::new("title")
                    .with_alias("important")
                    .with_pattern(
                        Pattern::new(&format!(
                            r"[A-Za-z0-9_]+{DOT}*(?:\r?\n|\r)(?:==+|--+)"
                        ))?
                        .with_inside(punctuation(r"==+$|--+$")?),
                    )
                    .with_pattern(
                        Pattern::new(&format!(r"(?m)(?:^\s*)(?P<body>#+{DOT}+)"))?
                            .with_inside(punctuation(r"^#+|#+$")?),
                    ),
            )
            .rule(
                Rule::new("hr").with_alias("punctuation").with_pattern(Pattern::new(
                    r"(?m)(?:^\s*)(?P<body>\*(?:[\t ]*\*){2,}|-(?:[\t ]*-){2,})\s*$",
                )?),
            )
            .rule(
                Rule::new("list")
                    .with_alias("punctuation")
                    .with_pattern(Pattern::new(&format!(
                        r"(?m)(?:^\s*)(?P<body>[*+-]|[0-9]+\.)[\t ]{DOT}"
                    ))?),
            )
            .rule(url_reference()?)
            .rule(bold(Some(italic(None)?))?)
            .rule(italic(Some(bold(Some(italic(None)?))?))?)
            .rule(url()?)
            .build())
    }
}

/// Incremental grammar construction.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
}

impl GrammarBuilder {
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Grammar {
        Grammar { rules: self.rules }
    }
}

static MARKDOWN: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::markdown().expect("built-in markdown grammar compiles"));

/// The shared markdown grammar, compiled on first use.
pub fn markdown_grammar() -> &'static Grammar {
    &MARKDOWN
}

fn punctuation(source: &str) -> Result<Grammar, GrammarError> {
    Ok(Grammar::builder()
        .rule(Rule::new("punctuation").with_pattern(Pattern::new(source)?))
        .build())
}

/// Backslash-escape or any non-special character inside a quoted run.
fn quoted(open: char, close: char) -> String {
    let open = regex::escape(&open.to_string());
    let close_class = match close {
        ')' => r"\)".to_owned(),
        other => other.to_string(),
    };
    let close_lit = regex::escape(&close.to_string());
    format!(r"{open}(?:\\{DOT}|[^{close_class}\\])*{close_lit}")
}

fn url_reference() -> Result<Rule, GrammarError> {
    let title = format!(
        "(?:{}|{}|{})",
        quoted('"', '"'),
        quoted('\'', '\''),
        quoted('(', ')')
    );
    let inside = Grammar::builder()
        .rule(Rule::new("variable").with_pattern(Pattern::new(r"^(?:!?\[)(?P<body>[^\]]+)")?))
        .rule(Rule::new("string").with_pattern(Pattern::new(&format!("{title}$"))?))
        .rule(Rule::new("punctuation").with_pattern(Pattern::new(r"^[\[\]!:]|[<>]")?))
        .build();
    Ok(Rule::new("url-reference").with_alias("url").with_pattern(
        Pattern::new(&format!(
            r"!?\[[^\]]+\]:[\t ]+(?:\S+|<(?:\\{DOT}|[^>\\])+>)(?:[\t ]+{title})?"
        ))?
        .with_inside(inside),
    ))
}

fn url() -> Result<Rule, GrammarError> {
    let string = quoted('"', '"');
    let inside = Grammar::builder()
        .rule(Rule::new("variable").with_pattern(Pattern::new(r"(?:!?\[)(?P<body>[^\]]+)\]$")?))
        .rule(Rule::new("string").with_pattern(Pattern::new(&format!(r"(?P<body>{string})\)$"))?))
        .build();
    Ok(Rule::new("url").with_pattern(
        Pattern::new(&format!(
            r#"!?\[[^\]]+\](?:\([^\s)]+(?:[\t ]+{string})?\)| ?\[[^\]\n]*\])"#
        ))?
        .with_inside(inside),
    ))
}

/// Delimited emphasis: `delims` are the two accepted markers, tried in order.
fn emphasis(delims: [&str; 2]) -> Result<Pattern, GrammarError> {
    let run = format!(r"(?:\r?\n|\r|{DOT})+?");
    let [a, b] = delims.map(regex::escape);
    Pattern::new(&format!(
        r"(?:^|[^\\])(?P<body>{a}{run}{a}|{b}{run}{b})"
    ))
    .map(|p| p.with_guard(Guard::NoBlankLine))
}

fn emphasis_inside(punct: &str, nested: Option<Rule>) -> Result<Grammar, GrammarError> {
    let mut builder = Grammar::builder()
        .rule(Rule::new("punctuation").with_pattern(Pattern::new(punct)?))
        .rule(url()?);
    if let Some(rule) = nested {
        builder = builder.rule(rule);
    }
    Ok(builder.build())
}

/// `**bold**` / `__bold__`, optionally allowing `nested` emphasis inside.
fn bold(nested: Option<Rule>) -> Result<Rule, GrammarError> {
    Ok(Rule::new("bold").with_pattern(
        emphasis(["**", "__"])?
            .with_inside(emphasis_inside(r"^\*\*|^__|\*\*$|__$", nested)?),
    ))
}

/// `*italic*` / `_italic_`, optionally allowing `nested` emphasis inside.
fn italic(nested: Option<Rule>) -> Result<Rule, GrammarError> {
    Ok(Rule::new("italic").with_pattern(
        emphasis(["*", "_"])?.with_inside(emphasis_inside(r"^[*_]|[*_]$", nested)?),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(grammar: &Grammar, kind: &str, text: &'a str) -> Option<&'a str> {
        grammar
            .rule(kind)?
            .patterns()
            .iter()
            .find_map(|p| p.find(text))
            .map(|r| &text[r])
    }

    #[test]
    fn test_markdown_rule_order() {
        let grammar = markdown_grammar();
        let kinds: Vec<_> = grammar.rules().iter().map(|r| r.kind().as_str()).collect();
        assert_eq!(
            kinds,
            [
                "blockquote",
                "code",
                "title",
                "hr",
                "list",
                "url-reference",
                "bold",
                "italic",
                "url"
            ]
        );
    }

    #[test]
    fn test_context_groups_are_not_part_of_the_token() {
        let g = markdown_grammar();
        assert_eq!(find(g, "title", "  ## Heading"), Some("## Heading"));
        assert_eq!(find(g, "list", "  - item"), Some("-"));
        assert_eq!(find(g, "list", "12. item"), Some("12."));
        assert_eq!(find(g, "hr", "* * *  "), Some("* * *"));
        assert_eq!(find(g, "bold", "a **b** c"), Some("**b**"));
    }

    #[test]
    fn test_list_needs_content_after_marker() {
        let g = markdown_grammar();
        assert_eq!(find(g, "list", "-"), None);
        assert_eq!(find(g, "list", "- "), None);
        assert_eq!(find(g, "list", "-x"), None);
    }

    #[test]
    fn test_hr_requires_same_marker() {
        let g = markdown_grammar();
        assert_eq!(find(g, "hr", "---"), Some("---"));
        assert_eq!(find(g, "hr", "*-*"), None);
        assert_eq!(find(g, "hr", "--- x"), None);
    }

    #[test]
    fn test_emphasis_markers_must_pair() {
        let g = markdown_grammar();
        assert_eq!(find(g, "bold", "**a__"), None);
        assert_eq!(find(g, "bold", "__a__"), Some("__a__"));
        assert_eq!(find(g, "italic", "*a_"), None);
        assert_eq!(find(g, "italic", "_a_"), Some("_a_"));
    }

    #[test]
    fn test_escaped_emphasis_is_ignored() {
        let g = markdown_grammar();
        assert_eq!(find(g, "bold", r"\**a**"), None);
    }

    #[test]
    fn test_emphasis_rejects_blank_line() {
        let g = markdown_grammar();
        assert_eq!(find(g, "bold", "**a\n\nb**"), None);
        assert_eq!(find(g, "bold", "**a\nb**"), Some("**a\nb**"));
    }

    #[test]
    fn test_guard_failure_moves_on_to_next_match() {
        let g = markdown_grammar();
        assert_eq!(find(g, "italic", "*a\n\nb*"), None);
        assert_eq!(find(g, "bold", "**a\n\nb** **c**"), Some("** **"));
    }

    #[test]
    fn test_emphasis_nesting_is_bounded() {
        let g = markdown_grammar();
        let inner = |grammar: &Grammar, kind: &str| -> Option<Grammar> {
            grammar.rule(kind)?.patterns()[0].inside().cloned()
        };

        let in_bold = inner(g, "bold").unwrap();
        let italic_in_bold = inner(&in_bold, "italic").unwrap();
        assert!(italic_in_bold.rule("bold").is_none());

        let in_italic = inner(g, "italic").unwrap();
        let bold_in_italic = inner(&in_italic, "bold").unwrap();
        let italic_in_bold_in_italic = inner(&bold_in_italic, "italic").unwrap();
        assert!(italic_in_bold_in_italic.rule("bold").is_none());
        assert!(italic_in_bold_in_italic.rule("url").is_some());
    }

    #[test]
    fn test_invalid_pattern_reports_source() {
        let err = Pattern::new(r"(\w+").unwrap_err();
        assert!(matches!(err, GrammarError::Pattern { ref pattern, .. } if pattern == r"(\w+"));
    }
}
