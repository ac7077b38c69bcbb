//! Terminal syntax highlighting for entry bodies.
//!
//! # Responsibility
//! - Map an entry's `syntax` hint to a grammar.
//! - Render highlight events as ANSI styles from the configured palette.
//!
//! # Invariants
//! - Text with an unsupported hint is returned unchanged.
//! - Stripping the escapes from highlighted text gives back the input.

use anyhow::{anyhow, bail};
use log::debug;
use owo_colors::{OwoColorize, Style};
use tree_sitter::Language;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

const HIGHLIGHT_NAMES: [&str; 10] = [
    "comment",
    "constant",
    "embedded",
    "function",
    "keyword",
    "number",
    "operator",
    "property",
    "string",
    "variable",
];

/// Grammars bodies can be highlighted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Bash,
}

impl Syntax {
    /// Grammar for an entry's `syntax` hint. An empty hint means bash.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "" | "bash" | "sh" | "shell" | "zsh" => Some(Self::Bash),
            _ => None,
        }
    }
}

/// Style per entry of [`HIGHLIGHT_NAMES`]; `None` prints plain.
struct Palette(Vec<Option<Style>>);

impl Palette {
    fn from_name(name: &str) -> anyhow::Result<Self> {
        let pick: fn(&str) -> Option<Style> = match name {
            "bw" => bw,
            "color" => color,
            other => bail!("unknown style `{other}`"),
        };
        Ok(Self(HIGHLIGHT_NAMES.iter().map(|capture| pick(capture)).collect()))
    }

    fn style(&self, index: usize) -> Option<Style> {
        self.0.get(index).copied().flatten()
    }
}

fn bw(capture: &str) -> Option<Style> {
    match capture {
        "comment" => Some(Style::new().dimmed()),
        "function" | "keyword" => Some(Style::new().bold()),
        "string" => Some(Style::new().italic()),
        _ => None,
    }
}

fn color(capture: &str) -> Option<Style> {
    match capture {
        "comment" => Some(Style::new().bright_black().italic()),
        "constant" | "number" => Some(Style::new().yellow()),
        "function" => Some(Style::new().blue()),
        "keyword" => Some(Style::new().magenta().bold()),
        "operator" => Some(Style::new().bold()),
        "property" | "variable" => Some(Style::new().cyan()),
        "string" => Some(Style::new().green()),
        _ => None,
    }
}

pub struct SyntaxHighlighter {
    bash: HighlightConfiguration,
    palette: Palette,
}

impl SyntaxHighlighter {
    /// Builds the grammars and the palette named by `style`.
    pub fn new(style: &str) -> anyhow::Result<Self> {
        let mut bash = HighlightConfiguration::new(
            Language::new(tree_sitter_bash::LANGUAGE),
            "bash",
            tree_sitter_bash::HIGHLIGHT_QUERY,
            "",
            "",
        )
        .map_err(|err| anyhow!("failed to load bash highlight query: {err:?}"))?;
        bash.configure(&HIGHLIGHT_NAMES);

        Ok(Self {
            bash,
            palette: Palette::from_name(style)?,
        })
    }

    /// Highlights `text` according to the `syntax` hint.
    pub fn highlight(&self, hint: &str, text: &str) -> anyhow::Result<String> {
        let Some(syntax) = Syntax::from_hint(hint) else {
            debug!("event=highlight module=cli status=skipped syntax={hint}");
            return Ok(text.to_string());
        };
        let config = match syntax {
            Syntax::Bash => &self.bash,
        };

        let mut highlighter = Highlighter::new();
        let events = highlighter
            .highlight(config, text.as_bytes(), None, |_| None)
            .map_err(|err| anyhow!("failed to highlight: {err:?}"))?;

        let mut out = String::with_capacity(text.len());
        let mut active = Vec::new();
        for event in events {
            match event.map_err(|err| anyhow!("failed to highlight: {err:?}"))? {
                HighlightEvent::HighlightStart(highlight) => active.push(highlight.0),
                HighlightEvent::HighlightEnd => {
                    active.pop();
                }
                HighlightEvent::Source { start, end } => {
                    let chunk = &text[start..end];
                    match active.last().and_then(|index| self.palette.style(*index)) {
                        Some(style) => out.push_str(&chunk.style(style).to_string()),
                        None => out.push_str(chunk),
                    }
                }
            }
        }
        Ok(out)
    }
}
