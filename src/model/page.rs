// src/model/page.rs
use super::block::{Block, HeadingLevel, TableBlock};
use super::properties::PropertySet;
use super::rich_text::RichText;
use crate::types::{PageId, PropertyName};

/// A link from the page being built to another page of the same database,
/// made once both pages exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRelation {
    /// Title of the page to link to.
    pub target_name: String,
    /// Property on the new page listing its targets.
    pub forward: PropertyName,
    /// Property on each target pointing back at its sources.
    pub back: PropertyName,
}

/// A resolved relation between two existing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRequest {
    pub source: PageId,
    pub target: PageId,
    pub forward: PropertyName,
    pub back: PropertyName,
}

/// Ordered body content of a page, plus the relations it asks for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBody {
    pub blocks: Vec<Block>,
    pub relations: Vec<PendingRelation>,
}

impl PageBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn heading(&mut self, level: HeadingLevel, text: impl Into<String>) -> &mut Self {
        self.push(Block::heading(level, text))
    }

    pub fn divider(&mut self) -> &mut Self {
        self.push(Block::Divider)
    }

    /// A paragraph with `**bold**` spans honored.
    pub fn paragraph(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.push(Block::paragraph(text))
    }

    /// A paragraph of prepared rich text, such as one with mentions.
    pub fn rich_paragraph(&mut self, run: Vec<RichText>) -> &mut Self {
        self.push(Block::Paragraph(run))
    }

    pub fn paragraphs<I, S>(&mut self, texts: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in texts {
            self.paragraph(text);
        }
        self
    }

    pub fn bullets<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.push(Block::bullet(item));
        }
        self
    }

    pub fn table(&mut self, table: TableBlock) -> &mut Self {
        self.push(Block::Table(table))
    }

    pub fn relate(&mut self, relation: PendingRelation) -> &mut Self {
        self.relations.push(relation);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Everything needed to publish one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDraft {
    pub name: String,
    pub properties: PropertySet,
    pub body: PageBody,
}
