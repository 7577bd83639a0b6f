// src/model/mod.rs
//! The in-process shape of what gets published: schemas, property values,
//! body blocks and the rich text inside them.

mod block;
mod page;
mod properties;
mod rich_text;
mod schema;

pub use block::{Block, HeadingLevel, TableBlock};
pub use page::{PageBody, PageDraft, PendingRelation, RelationRequest};
pub use properties::{option_name, PropertySet, PropertyValue};
pub use rich_text::{parse_emphasis, plain_text, Annotations, RichText, RichTextKind};
pub use schema::{category_value, OptionSet, PropertyKind, SchemaDefinition, SelectOption};
