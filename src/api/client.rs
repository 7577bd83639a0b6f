// src/api/client.rs
//! HTTP client wrapper for the Notion API.
//!
//! Handles authentication headers and request/response plumbing. Request
//! bodies come from [`super::payload`], response parsing from
//! [`super::responses`].

use super::payload;
use super::responses::{parse_response, CreatedObject, SearchResponse};
use super::{NotionWorkspace, SearchPage};
use crate::error::AppError;
use crate::model::{Block, PropertySet, SchemaDefinition};
use crate::types::{ApiKey, DatabaseId, PageId, PropertyName};
use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self { client })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    async fn send(&self, method: Method, endpoint: &str, body: &Value) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("{} {}", method, url);
        Ok(self.client.request(method, url).json(body).send().await?)
    }

    /// Sends `body` and decodes the reply, mapping API errors to [`AppError`].
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &Value,
    ) -> Result<T, AppError> {
        let response = self.send(method, endpoint, body).await?;
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().await?;
        parse_response(status, &text, &url)
    }
}

#[async_trait::async_trait]
impl NotionWorkspace for NotionHttpClient {
    async fn create_database(
        &self,
        parent: &PageId,
        schema: &SchemaDefinition,
    ) -> Result<DatabaseId, AppError> {
        let body = payload::create_database_body(parent, schema);
        let created: CreatedObject = self.call(Method::POST, "databases", &body).await?;
        created.parse_id()
    }

    async fn add_relation_properties(
        &self,
        database: &DatabaseId,
        names: &[PropertyName],
    ) -> Result<(), AppError> {
        let endpoint = format!("databases/{}", database.to_dashed());
        let body = payload::relation_schema_body(database, names);
        let _: CreatedObject = self.call(Method::PATCH, &endpoint, &body).await?;
        Ok(())
    }

    async fn create_page(
        &self,
        database: &DatabaseId,
        properties: &PropertySet,
        children: &[Block],
    ) -> Result<PageId, AppError> {
        let body = payload::create_page_body(database, properties, children);
        let created: CreatedObject = self.call(Method::POST, "pages", &body).await?;
        created.parse_id()
    }

    async fn append_blocks(&self, page: &PageId, children: &[Block]) -> Result<(), AppError> {
        let endpoint = format!("blocks/{}/children", page.to_dashed());
        let body = payload::append_blocks_body(children);
        let _: Value = self.call(Method::PATCH, &endpoint, &body).await?;
        Ok(())
    }

    async fn search_pages(
        &self,
        query: &str,
        cursor: Option<&str>,
    ) -> Result<SearchPage, AppError> {
        let body = payload::search_body(query, cursor);
        let response: SearchResponse = self.call(Method::POST, "search", &body).await?;
        Ok(response.into_search_page())
    }

    async fn update_page_properties(
        &self,
        page: &PageId,
        properties: &PropertySet,
    ) -> Result<(), AppError> {
        let endpoint = format!("pages/{}", page.to_dashed());
        let body = payload::update_page_body(properties);
        let _: CreatedObject = self.call(Method::PATCH, &endpoint, &body).await?;
        Ok(())
    }
}
