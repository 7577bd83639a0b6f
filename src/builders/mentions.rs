// src/builders/mentions.rs
//! Turns known entity names inside body text into page mentions.
//!
//! Builders mark keyword occurrences as pending mentions with
//! [`split_mentions`]; once the page is about to be published,
//! [`resolve_mentions`] looks each name up and swaps in a page link,
//! leaving plain text behind when nothing matches.

use crate::model::{Block, RichText};
use crate::types::PageId;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;

/// Finds an already-published page by title.
#[async_trait]
pub trait PageLookup: Send + Sync {
    /// `None` when no page matches or the lookup itself failed.
    async fn find_page(&self, name: &str, category: Option<&str>) -> Option<PageId>;
}

/// Splits `text` around every occurrence of every keyword.
///
/// Keywords are matched case-sensitively as an alternation tried longest
/// first, so "Light Crossbow" wins over "Light" at the same position.
/// Text with no occurrence comes back as a single plain item.
pub fn split_mentions<S: AsRef<str>>(
    text: &str,
    keywords: &[S],
    category: Option<&str>,
) -> Vec<RichText> {
    let mut sorted: Vec<&str> = keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|k| !k.is_empty())
        .collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted.dedup();

    if sorted.is_empty() {
        return vec![RichText::plain(text)];
    }

    let pattern = sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(matcher) = Regex::new(&pattern) else {
        log::warn!("Could not build mention pattern from {} keywords", sorted.len());
        return vec![RichText::plain(text)];
    };

    let mut run = Vec::new();
    let mut cursor = 0;
    for found in matcher.find_iter(text) {
        if found.start() > cursor {
            run.push(RichText::plain(&text[cursor..found.start()]));
        }
        run.push(RichText::pending(found.as_str(), category));
        cursor = found.end();
    }
    if cursor < text.len() {
        run.push(RichText::plain(&text[cursor..]));
    }
    if run.is_empty() {
        run.push(RichText::plain(text));
    }
    run
}

/// A paragraph-ready run that mentions each of `names`, separated by `separator`.
pub fn mention_list<S: AsRef<str>>(
    names: &[S],
    separator: &str,
    category: Option<&str>,
) -> Vec<RichText> {
    let mut run = Vec::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            run.push(RichText::plain(separator));
        }
        run.push(RichText::pending(name.as_ref(), category));
    }
    run
}

/// Resolves every pending mention in `blocks`, one lookup per distinct name.
///
/// Returns how many distinct names resolved to a page.
pub async fn resolve_mentions(blocks: &mut [Block], lookup: &dyn PageLookup) -> usize {
    let mut wanted: Vec<(String, Option<String>)> = Vec::new();
    for block in blocks.iter_mut() {
        for key in block.pending_mentions() {
            if !wanted.contains(&key) {
                wanted.push(key);
            }
        }
    }
    if wanted.is_empty() {
        return 0;
    }

    let mut resolved = HashMap::with_capacity(wanted.len());
    for (name, category) in wanted {
        let page = lookup.find_page(&name, category.as_deref()).await;
        if page.is_none() {
            log::debug!("No page found for mention '{}'", name);
        }
        resolved.insert((name, category), page);
    }

    for block in blocks.iter_mut() {
        block.apply_mentions(&resolved);
    }
    resolved.values().filter(|page| page.is_some()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{plain_text, RichTextKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_without_keywords_is_unchanged() {
        for text in ["", "Martial Melee", "nothing to see here"] {
            assert_eq!(
                split_mentions(text, &["Finesse", "Light"], None),
                vec![RichText::plain(text)]
            );
        }
        assert_eq!(
            split_mentions::<&str>("Finesse", &[], None),
            vec![RichText::plain("Finesse")]
        );
    }

    #[test]
    fn test_every_occurrence_is_split_out() {
        let run = split_mentions(
            "Finesse, Light, Thrown",
            &["Light", "Finesse"],
            Some("Weapon Properties"),
        );
        assert_eq!(
            run,
            vec![
                RichText::pending("Finesse", Some("Weapon Properties")),
                RichText::plain(", "),
                RichText::pending("Light", Some("Weapon Properties")),
                RichText::plain(", Thrown"),
            ]
        );
        assert_eq!(plain_text(&run), "Finesse, Light, Thrown");
    }

    #[test]
    fn test_longest_keyword_wins() {
        let run = split_mentions(
            "Light Crossbow",
            &["Light", "Light Crossbow"],
            None,
        );
        assert_eq!(run, vec![RichText::pending("Light Crossbow", None)]);
    }

    struct Fixed;

    #[async_trait]
    impl PageLookup for Fixed {
        async fn find_page(&self, name: &str, _category: Option<&str>) -> Option<PageId> {
            (name == "Stealth").then(|| PageId::parse("11111111111111111111111111111111").unwrap())
        }
    }

    #[tokio::test]
    async fn test_resolution_links_known_names_only() {
        let mut blocks = vec![Block::Paragraph(mention_list(
            &["Stealth", "Acrobatics"],
            ", ",
            Some("Skills"),
        ))];
        let found = resolve_mentions(&mut blocks, &Fixed).await;
        assert_eq!(found, 1);

        let Block::Paragraph(run) = &blocks[0] else {
            panic!("expected paragraph")
        };
        assert!(matches!(run[0].kind, RichTextKind::Mention(_)));
        assert_eq!(run[2], RichText::plain("Acrobatics"));
    }
}
