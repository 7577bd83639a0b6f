// src/api/payload.rs
//! Request bodies for the Notion API, built from the in-process model.

use crate::constants::{NOTION_MAX_TEXT_LENGTH, NOTION_SEARCH_PAGE_SIZE};
use crate::model::{
    Block, OptionSet, PropertyKind, PropertySet, PropertyValue, RichText, RichTextKind,
    SchemaDefinition, TableBlock,
};
use crate::types::{DatabaseId, PageId, PropertyName};
use serde_json::{json, Map, Value};

/// Splits `content` into pieces the API accepts in one text object.
fn split_text(content: &str) -> Vec<String> {
    if content.chars().count() <= NOTION_MAX_TEXT_LENGTH {
        return vec![content.to_string()];
    }
    content
        .chars()
        .collect::<Vec<_>>()
        .chunks(NOTION_MAX_TEXT_LENGTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn annotations_json(item: &RichText) -> Value {
    let annotations = &item.annotations;
    json!({
        "bold": annotations.bold,
        "italic": annotations.italic,
        "strikethrough": false,
        "underline": false,
        "code": annotations.code,
        "color": annotations.color.as_str(),
    })
}

fn text_objects(content: &str, item: &RichText, out: &mut Vec<Value>) {
    for piece in split_text(content) {
        out.push(json!({
            "type": "text",
            "text": { "content": piece },
            "annotations": annotations_json(item),
        }));
    }
}

/// Encodes a run of rich text. Pending mentions that were never resolved go
/// out as their plain name.
pub fn rich_text_json(run: &[RichText]) -> Vec<Value> {
    let mut out = Vec::with_capacity(run.len());
    for item in run {
        match &item.kind {
            RichTextKind::Text(content) if content.is_empty() => {}
            RichTextKind::Text(content) => text_objects(content, item, &mut out),
            RichTextKind::PendingMention { name, .. } => text_objects(name, item, &mut out),
            RichTextKind::Mention(page) => out.push(json!({
                "type": "mention",
                "mention": { "type": "page", "page": { "id": page.to_dashed() } },
                "annotations": annotations_json(item),
            })),
        }
    }
    out
}

fn plain_rich_text(content: &str) -> Vec<Value> {
    rich_text_json(&[RichText::plain(content)])
}

fn typed_block(kind: &str, content: Value) -> Value {
    let mut block = Map::new();
    block.insert("object".to_string(), json!("block"));
    block.insert("type".to_string(), json!(kind));
    block.insert(kind.to_string(), content);
    Value::Object(block)
}

fn table_json(table: &TableBlock) -> Value {
    let rows: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            let cells: Vec<Vec<Value>> = row.iter().map(|cell| rich_text_json(cell)).collect();
            typed_block("table_row", json!({ "cells": cells }))
        })
        .collect();
    json!({
        "table_width": table.width(),
        "has_column_header": true,
        "has_row_header": false,
        "children": rows,
    })
}

pub fn block_json(block: &Block) -> Value {
    let kind = block.block_type();
    let content = match block {
        Block::Paragraph(run)
        | Block::BulletedListItem(run)
        | Block::NumberedListItem(run)
        | Block::Quote(run)
        | Block::Heading { text: run, .. } => json!({ "rich_text": rich_text_json(run) }),
        Block::Table(table) => table_json(table),
        Block::Divider => json!({}),
        Block::Callout { text, icon, color } => {
            let mut callout = json!({
                "rich_text": rich_text_json(text),
                "color": color.as_str(),
            });
            if let Some(icon) = icon {
                callout["icon"] = json!({ "type": "emoji", "emoji": icon });
            }
            callout
        }
        Block::Toggle { title, children } => json!({
            "rich_text": rich_text_json(title),
            "children": blocks_json(children),
        }),
        Block::TableOfContents => json!({ "color": "default" }),
    };
    typed_block(kind, content)
}

pub fn blocks_json(blocks: &[Block]) -> Vec<Value> {
    blocks.iter().map(block_json).collect()
}

pub fn property_value_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(text) => json!({ "title": plain_rich_text(text) }),
        PropertyValue::RichText(text) => json!({ "rich_text": plain_rich_text(text) }),
        PropertyValue::Number(number) => json!({ "number": number }),
        PropertyValue::Checkbox(checked) => json!({ "checkbox": checked }),
        PropertyValue::Url(url) => json!({ "url": url.as_ref().map(|u| u.as_str()) }),
        PropertyValue::Select(option) => json!({
            "select": option.as_ref().map(|name| json!({ "name": name })),
        }),
        PropertyValue::MultiSelect(options) => json!({
            "multi_select": options.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        }),
        PropertyValue::Relation(pages) => json!({
            "relation": pages.iter().map(|id| json!({ "id": id.to_dashed() })).collect::<Vec<_>>(),
        }),
    }
}

pub fn properties_json(properties: &PropertySet) -> Value {
    let map: Map<String, Value> = properties
        .iter()
        .map(|(name, value)| (name.to_string(), property_value_json(value)))
        .collect();
    Value::Object(map)
}

fn options_json(options: &OptionSet) -> Value {
    let declared: Vec<Value> = match options {
        OptionSet::Open => Vec::new(),
        OptionSet::Declared(options) => options
            .iter()
            .map(|o| json!({ "name": o.name, "color": o.color.as_str() }))
            .collect(),
    };
    json!({ "options": declared })
}

fn property_kind_json(kind: &PropertyKind) -> Value {
    match kind {
        PropertyKind::Title => json!({ "title": {} }),
        PropertyKind::RichText => json!({ "rich_text": {} }),
        PropertyKind::Number => json!({ "number": { "format": "number" } }),
        PropertyKind::Checkbox => json!({ "checkbox": {} }),
        PropertyKind::Url => json!({ "url": {} }),
        PropertyKind::Select(options) => json!({ "select": options_json(options) }),
        PropertyKind::MultiSelect(options) => json!({ "multi_select": options_json(options) }),
        PropertyKind::Relation => json!({ "relation": {} }),
    }
}

/// `POST /databases`. Relation properties are left for [`relation_schema_body`].
pub fn create_database_body(parent: &PageId, schema: &SchemaDefinition) -> Value {
    let properties: Map<String, Value> = schema
        .creatable_properties()
        .map(|(name, kind)| (name.to_string(), property_kind_json(kind)))
        .collect();
    json!({
        "parent": { "type": "page_id", "page_id": parent.to_dashed() },
        "title": plain_rich_text(&schema.title),
        "properties": properties,
    })
}

/// `PATCH /databases/{id}` adding self-referencing relation properties.
pub fn relation_schema_body(database: &DatabaseId, names: &[PropertyName]) -> Value {
    let properties: Map<String, Value> = names
        .iter()
        .map(|name| {
            (
                name.to_string(),
                json!({
                    "relation": {
                        "database_id": database.to_dashed(),
                        "type": "single_property",
                        "single_property": {},
                    }
                }),
            )
        })
        .collect();
    json!({ "properties": properties })
}

/// `POST /pages` with the first chunk of the body.
pub fn create_page_body(
    database: &DatabaseId,
    properties: &PropertySet,
    children: &[Block],
) -> Value {
    json!({
        "parent": { "database_id": database.to_dashed() },
        "properties": properties_json(properties),
        "children": blocks_json(children),
    })
}

/// `PATCH /blocks/{id}/children`.
pub fn append_blocks_body(children: &[Block]) -> Value {
    json!({ "children": blocks_json(children) })
}

/// `PATCH /pages/{id}`.
pub fn update_page_body(properties: &PropertySet) -> Value {
    json!({ "properties": properties_json(properties) })
}

/// `POST /search` for pages whose title matches `query`, oldest edits first.
pub fn search_body(query: &str, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "query": query,
        "filter": { "property": "object", "value": "page" },
        "sort": { "direction": "ascending", "timestamp": "last_edited_time" },
        "page_size": NOTION_SEARCH_PAGE_SIZE,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}
