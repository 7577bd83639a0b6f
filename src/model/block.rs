// src/model/block.rs
use super::rich_text::{parse_emphasis, RichText, RichTextKind};
use crate::types::{Color, PageId, ValidationError};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn block_type(&self) -> &'static str {
        match self {
            HeadingLevel::One => "heading_1",
            HeadingLevel::Two => "heading_2",
            HeadingLevel::Three => "heading_3",
        }
    }
}

/// A table with a fixed column count. The first row is the column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    width: usize,
    rows: Vec<Vec<Vec<RichText>>>,
}

impl TableBlock {
    /// Starts a table whose width is the number of header cells.
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            width: header.len(),
            rows: vec![header
                .iter()
                .map(|cell| vec![RichText::plain(cell.as_ref())])
                .collect()],
        }
    }

    /// Appends a data row of rich text cells.
    pub fn push_row(&mut self, cells: Vec<Vec<RichText>>) -> Result<(), ValidationError> {
        if cells.len() != self.width {
            return Err(ValidationError::TableShape {
                expected: self.width,
                actual: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Appends a data row of plain text cells.
    pub fn push_text_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), ValidationError> {
        self.push_row(
            cells
                .iter()
                .map(|cell| vec![RichText::plain(cell.as_ref())])
                .collect(),
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Header row followed by data rows.
    pub fn rows(&self) -> &[Vec<Vec<RichText>>] {
        &self.rows
    }

    fn runs_mut(&mut self) -> impl Iterator<Item = &mut Vec<RichText>> {
        self.rows.iter_mut().flat_map(|row| row.iter_mut())
    }
}

/// One unit of page body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<RichText>),
    Heading {
        level: HeadingLevel,
        text: Vec<RichText>,
    },
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    Table(TableBlock),
    Divider,
    Quote(Vec<RichText>),
    Callout {
        text: Vec<RichText>,
        icon: Option<String>,
        color: Color,
    },
    /// An expandable section with nested blocks.
    Toggle {
        title: Vec<RichText>,
        children: Vec<Block>,
    },
    TableOfContents,
}

impl Block {
    /// A paragraph; `**bold**` spans in `text` render bold.
    pub fn paragraph(text: impl AsRef<str>) -> Self {
        Block::Paragraph(parse_emphasis(text.as_ref()))
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: vec![RichText::plain(text)],
        }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Block::BulletedListItem(vec![RichText::plain(text)])
    }

    pub fn numbered(text: impl Into<String>) -> Self {
        Block::NumberedListItem(vec![RichText::plain(text)])
    }

    pub fn quote(text: impl Into<String>) -> Self {
        Block::Quote(vec![RichText::plain(text)])
    }

    pub fn callout(text: impl Into<String>, icon: Option<&str>, color: Color) -> Self {
        Block::Callout {
            text: vec![RichText::plain(text)],
            icon: icon.map(str::to_string),
            color,
        }
    }

    pub fn toggle(title: impl Into<String>, children: Vec<Block>) -> Self {
        Block::Toggle {
            title: vec![RichText::plain(title)],
            children,
        }
    }

    /// Get block type name
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading { level, .. } => level.block_type(),
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::Table(_) => "table",
            Block::Divider => "divider",
            Block::Quote(_) => "quote",
            Block::Callout { .. } => "callout",
            Block::Toggle { .. } => "toggle",
            Block::TableOfContents => "table_of_contents",
        }
    }

    /// Visits every rich text run in this block, including nested ones.
    pub fn visit_runs_mut(&mut self, visit: &mut dyn FnMut(&mut Vec<RichText>)) {
        match self {
            Block::Paragraph(run)
            | Block::BulletedListItem(run)
            | Block::NumberedListItem(run)
            | Block::Quote(run)
            | Block::Heading { text: run, .. }
            | Block::Callout { text: run, .. } => visit(run),
            Block::Table(table) => table.runs_mut().for_each(|run| visit(run)),
            Block::Toggle { title, children } => {
                visit(title);
                for child in children {
                    child.visit_runs_mut(visit);
                }
            }
            Block::Divider | Block::TableOfContents => {}
        }
    }

    /// Every unresolved mention in this block, as `(name, category)` pairs.
    pub fn pending_mentions(&mut self) -> Vec<(String, Option<String>)> {
        let mut found = Vec::new();
        self.visit_runs_mut(&mut |run| {
            for item in run.iter() {
                if let RichTextKind::PendingMention { name, category } = &item.kind {
                    found.push((name.clone(), category.clone()));
                }
            }
        });
        found
    }

    /// Replaces pending mentions with resolved pages, or plain text when unresolved.
    pub fn apply_mentions(&mut self, resolved: &HashMap<(String, Option<String>), Option<PageId>>) {
        self.visit_runs_mut(&mut |run| {
            for item in run.iter_mut() {
                let RichTextKind::PendingMention { name, category } = &item.kind else {
                    continue;
                };
                let key = (name.clone(), category.clone());
                item.kind = match resolved.get(&key).cloned().flatten() {
                    Some(page) => RichTextKind::Mention(page),
                    None => RichTextKind::Text(name.clone()),
                };
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_rejects_ragged_rows() {
        let mut table = TableBlock::new(&["Name", "Cost"]);
        assert!(table.push_text_row(&["Club", "1 sp"]).is_ok());
        assert_eq!(
            table.push_text_row(&["Club"]),
            Err(ValidationError::TableShape {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn test_mentions_resolve_inside_tables_and_toggles() {
        let page = PageId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let mut table = TableBlock::new(&["Properties"]);
        table
            .push_row(vec![vec![RichText::pending("Light", Some("Weapon Properties"))]])
            .unwrap();
        let mut blocks = vec![
            Block::Table(table),
            Block::Toggle {
                title: vec![RichText::plain("Click to Expand...")],
                children: vec![Block::Paragraph(vec![RichText::pending("Heavy", None)])],
            },
        ];

        let pending: Vec<_> = blocks.iter_mut().flat_map(|b| b.pending_mentions()).collect();
        assert_eq!(pending.len(), 2);

        let mut resolved = HashMap::new();
        resolved.insert(
            ("Light".to_string(), Some("Weapon Properties".to_string())),
            Some(page.clone()),
        );
        resolved.insert(("Heavy".to_string(), None), None);
        for block in &mut blocks {
            block.apply_mentions(&resolved);
        }

        let Block::Table(table) = &blocks[0] else {
            panic!("expected table")
        };
        assert_eq!(table.rows()[1][0], vec![RichText::mention(page)]);

        let Block::Toggle { children, .. } = &blocks[1] else {
            panic!("expected toggle")
        };
        assert_eq!(children[0], Block::Paragraph(vec![RichText::plain("Heavy")]));
    }

    #[test]
    fn test_block_type_names() {
        assert_eq!(Block::heading(HeadingLevel::Two, "x").block_type(), "heading_2");
        assert_eq!(Block::Divider.block_type(), "divider");
        assert_eq!(Block::TableOfContents.block_type(), "table_of_contents");
    }
}
