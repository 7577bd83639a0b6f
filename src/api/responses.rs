// src/api/responses.rs
//! Response bodies the publisher reads back from Notion.
//!
//! Only the fields the publisher needs are modelled: ids of created objects,
//! page titles and categories from search results, and error envelopes.

use super::{PageSummary, SearchPage};
use crate::constants::{CATEGORY_PROPERTY, ERROR_BODY_PREVIEW_LENGTH};
use crate::error::{AppError, NotionErrorCode};
use crate::types::Id;
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Any object the API just created or updated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    pub id: String,
}

impl CreatedObject {
    pub fn parse_id<T>(&self) -> Result<Id<T>, AppError> {
        Id::parse(&self.id).map_err(|e| {
            AppError::MalformedResponse(format!("Unexpected object id '{}': {}", self.id, e))
        })
    }
}

/// Notion's error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PlainText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SelectName {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawProperty {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Vec<PlainText>,
    #[serde(default)]
    select: Option<SelectName>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResult {
    id: String,
    #[serde(default)]
    properties: IndexMap<String, RawProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    results: Vec<SearchResult>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

impl SearchResponse {
    /// Page titles and categories. Results with an unusable id are dropped.
    pub fn into_search_page(self) -> SearchPage {
        let pages = self
            .results
            .into_iter()
            .filter_map(|result| {
                let id = match Id::parse(&result.id) {
                    Ok(id) => id,
                    Err(e) => {
                        log::warn!("Ignoring search result '{}': {}", result.id, e);
                        return None;
                    }
                };
                let title = result
                    .properties
                    .values()
                    .find(|p| p.kind == "title")
                    .map(|p| p.title.iter().map(|t| t.plain_text.as_str()).collect())
                    .unwrap_or_default();
                let category = result
                    .properties
                    .get(CATEGORY_PROPERTY)
                    .and_then(|p| p.select.as_ref())
                    .map(|s| s.name.clone());
                Some(PageSummary {
                    id,
                    title,
                    category,
                })
            })
            .collect();
        SearchPage {
            pages,
            next_cursor: if self.has_more { self.next_cursor } else { None },
        }
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Decodes a success body, or turns an error body into a typed service error.
pub fn parse_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    url: &str,
) -> Result<T, AppError> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", url, e);
            AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
        });
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) => Err(AppError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status,
        }),
        Err(_) => Err(AppError::NotionService {
            code: NotionErrorCode::from_http_status(status.as_u16()),
            message: format!("HTTP {} from {}: {}", status, url, preview(body)),
            status,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageId;
    use pretty_assertions::assert_eq;

    const SEARCH: &str = r#"{
        "object": "list",
        "results": [{
            "object": "page",
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "properties": {
                "5E Category": {"id": "a", "type": "select", "select": {"name": "Skills"}},
                "Name": {"id": "title", "type": "title", "title": [
                    {"type": "text", "plain_text": "Sleight "},
                    {"type": "text", "plain_text": "of Hand"}
                ]}
            }
        }, {
            "object": "page",
            "id": "not-an-id",
            "properties": {}
        }],
        "next_cursor": "cursor-2",
        "has_more": true
    }"#;

    #[test]
    fn test_search_results_keep_title_and_category() {
        let response: SearchResponse =
            parse_response(StatusCode::OK, SEARCH, "search").unwrap();
        let page = response.into_search_page();
        assert_eq!(
            page.pages,
            vec![PageSummary {
                id: PageId::parse("550e8400e29b41d4a716446655440000").unwrap(),
                title: "Sleight of Hand".to_string(),
                category: Some("Skills".to_string()),
            }]
        );
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
    }

    #[test]
    fn test_error_envelope_becomes_service_error() {
        let body = r#"{"object": "error", "status": 429, "code": "rate_limited", "message": "slow down"}"#;
        let err = parse_response::<CreatedObject>(StatusCode::TOO_MANY_REQUESTS, body, "pages")
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NotionService {
                code: NotionErrorCode::RateLimited,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_unparseable_error_falls_back_to_status() {
        let err = parse_response::<CreatedObject>(StatusCode::BAD_GATEWAY, "<html>", "pages")
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NotionService {
                code: NotionErrorCode::HttpStatus(502),
                ..
            }
        ));
    }

    #[test]
    fn test_created_object_id() {
        let created: CreatedObject = parse_response(
            StatusCode::OK,
            r#"{"object": "page", "id": "550e8400-e29b-41d4-a716-446655440000"}"#,
            "pages",
        )
        .unwrap();
        let id: PageId = created.parse_id().unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }
}
