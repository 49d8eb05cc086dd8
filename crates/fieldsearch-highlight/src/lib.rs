//! Terminal presentation for the fieldsearch CLI.
//!
//! Two kinds of text get colour: generated SQL (host and rewritten search
//! clauses) and `.fieldsearch.toml` templates, both through [`Highlighter`].
//! Everything else is plain lines tinted with one of a few [`Tone`]s.

#![warn(missing_docs)]

use std::io::{self, IsTerminal};

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// ANSI reset sequence.
const RESET: &str = "\x1b[0m";

/// Languages the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// SQL fragments and statements.
    Sql,
    /// Configuration files.
    Toml,
}

impl Syntax {
    /// File extension syntect knows the grammar by.
    fn extension(self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Toml => "toml",
        }
    }
}

/// Highlights SQL and TOML for a 24-bit colour terminal.
pub struct Highlighter {
    /// Grammars; two-face adds TOML to syntect's defaults.
    syntax_set: SyntaxSet,
    /// Lazily loaded themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter using the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Returns a highlighter if stdout is a terminal and colour was not
    /// turned off, otherwise `None` so callers print plain text.
    pub fn for_stdout(plain: bool) -> Option<Self> {
        (!plain && io::stdout().is_terminal()).then(Self::new)
    }

    /// Highlights `content`, ending with a reset so colour never leaks.
    ///
    /// Lines the grammar fails on are emitted unstyled.
    pub fn highlight(&self, content: &str, syntax: Syntax) -> String {
        let mut lines = HighlightLines::new(self.grammar(syntax), self.theme_set.get(self.theme));
        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);
        output
    }

    /// Grammar for `syntax`, plain text if the set lacks it.
    fn grammar(&self, syntax: Syntax) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension(syntax.extension())
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

/// Colour roles for plain CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section headings: bold cyan.
    Header,
    /// Ids, labels and notes: dim.
    Dim,
    /// "No issues found" style lines: green.
    Success,
    /// Configuration problems: yellow.
    Warning,
}

impl Tone {
    /// ANSI sequence that starts this tone.
    fn code(self) -> &'static str {
        match self {
            Self::Header => "\x1b[1;36m",
            Self::Dim => "\x1b[2m",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
        }
    }

    /// Wraps `text` in this tone.
    pub fn paint(self, text: &str) -> String {
        format!("{}{text}{RESET}", self.code())
    }
}

/// Section heading.
pub fn header(text: &str) -> String {
    Tone::Header.paint(text)
}

/// Secondary detail.
pub fn dim(text: &str) -> String {
    Tone::Dim.paint(text)
}

/// Positive status line.
pub fn success(text: &str) -> String {
    Tone::Success.paint(text)
}

/// Configuration problem.
pub fn warning(text: &str) -> String {
    Tone::Warning.paint(text)
}

/// Dimmed separator between search results.
pub fn rule(width: usize) -> String {
    dim(&"─".repeat(width))
}
