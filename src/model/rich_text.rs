// src/model/rich_text.rs
//! Inline text runs: plain text, bold spans, and page mentions.

use crate::types::{Color, PageId};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `***bold***` or `**bold**` spans. Triple asterisks are tried first.
static EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*").expect("emphasis pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub color: Color,
}

/// What a rich text item carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichTextKind {
    Text(String),
    /// A resolved link to another page.
    Mention(PageId),
    /// A keyword waiting for the resolver. Falls back to its name as plain text.
    PendingMention {
        name: String,
        category: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText {
    pub kind: RichTextKind,
    pub annotations: Annotations,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: RichTextKind::Text(content.into()),
            annotations: Annotations::default(),
        }
    }

    pub fn bold(content: impl Into<String>) -> Self {
        Self {
            kind: RichTextKind::Text(content.into()),
            annotations: Annotations {
                bold: true,
                ..Annotations::default()
            },
        }
    }

    pub fn mention(page: PageId) -> Self {
        Self {
            kind: RichTextKind::Mention(page),
            annotations: Annotations::default(),
        }
    }

    pub fn pending(name: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            kind: RichTextKind::PendingMention {
                name: name.into(),
                category: category.map(str::to_string),
            },
            annotations: Annotations::default(),
        }
    }

    /// The visible text, as it reads before any mention is resolved.
    pub fn plain_text(&self) -> &str {
        match &self.kind {
            RichTextKind::Text(content) => content,
            RichTextKind::Mention(_) => "",
            RichTextKind::PendingMention { name, .. } => name,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.kind, RichTextKind::PendingMention { .. })
    }
}

/// Concatenates the visible text of a run.
pub fn plain_text(run: &[RichText]) -> String {
    run.iter().map(RichText::plain_text).collect()
}

/// Splits `text` around `***bold***` and `**bold**` spans.
///
/// Empty plain segments between spans are dropped; text without any span
/// comes back as a single plain item.
pub fn parse_emphasis(text: &str) -> Vec<RichText> {
    let mut run = Vec::new();
    let mut cursor = 0;

    for caps in EMPHASIS.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            run.push(RichText::plain(&text[cursor..whole.start()]));
        }
        if let Some(inner) = caps.get(1).or_else(|| caps.get(2)) {
            run.push(RichText::bold(inner.as_str()));
        }
        cursor = whole.end();
    }

    if cursor < text.len() {
        run.push(RichText::plain(&text[cursor..]));
    }
    if run.is_empty() {
        run.push(RichText::plain(text));
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(
            parse_emphasis("Hit Points : 135"),
            vec![RichText::plain("Hit Points : 135")]
        );
        assert_eq!(parse_emphasis(""), vec![RichText::plain("")]);
    }

    #[test]
    fn test_double_and_triple_asterisks_are_bold() {
        assert_eq!(
            parse_emphasis("**Age.** Dwarves mature at the same rate as humans"),
            vec![
                RichText::bold("Age."),
                RichText::plain(" Dwarves mature at the same rate as humans"),
            ]
        );
        assert_eq!(
            parse_emphasis("***Shove.*** You push, and ***Grapple.***"),
            vec![
                RichText::bold("Shove."),
                RichText::plain(" You push, and "),
                RichText::bold("Grapple."),
            ]
        );
    }

    #[test]
    fn test_pending_mentions_read_as_their_name() {
        let run = vec![
            RichText::plain("Uses "),
            RichText::pending("Finesse", Some("Weapon Properties")),
        ];
        assert_eq!(plain_text(&run), "Uses Finesse");
        assert!(run[1].is_pending());
    }
}
