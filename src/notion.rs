use std::collections::HashSet;
use std::time::Duration;

use log::{debug, error, warn};
use reqwest::Client;
use serde_json::{json, Value};

use crate::app_config::StoreConfig;
use crate::document::{Block, Run};
use crate::email::content_fingerprint;
use crate::errors::StoreError;
use crate::urls;

// @module: Block store (Notion API) client and payload serialization

// Property names on the synced databases
pub const PROP_TITLE: &str = "Name";
pub const PROP_DATE: &str = "Date";
pub const PROP_SENDER: &str = "Sender";
pub const PROP_TYPE: &str = "Type";
pub const PROP_STATUS: &str = "Status";
pub const PROP_URL: &str = "URL";
pub const PROP_TICKERS: &str = "Tickers";

/// Maximum title length accepted by the store
const MAX_TITLE_LEN: usize = 200;

/// Maximum tickers attached to one page
const MAX_TICKERS: usize = 10;

/// Notion API client bound to one integration token
pub struct NotionClient {
    /// HTTP client for API requests
    client: Client,
    /// Integration token
    token: String,
    /// API base URL
    endpoint: String,
    /// API version header value
    api_version: String,
    /// Max blocks per create/append call
    batch_size: usize,
}

impl NotionClient {
    /// Create a client for the primary database token
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_token(config, config.api_token.clone())
    }

    /// Create a client for the secondary database token
    pub fn secondary(config: &StoreConfig) -> Option<Self> {
        if config.has_secondary() {
            Some(Self::with_token(config, config.secondary_api_token.clone()))
        } else {
            None
        }
    }

    fn with_token(config: &StoreConfig, token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            token,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            batch_size: config.block_batch_size.max(1),
        }
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, StoreError> {
        self.send(self.client.post(url), body).await
    }

    async fn patch(&self, url: &str, body: &Value) -> Result<Value, StoreError> {
        self.send(self.client.patch(url), body).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        body: &Value,
    ) -> Result<Value, StoreError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .header("Notion-Version", &self.api_version)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Store API error ({}): {}", status, message);
            return Err(StoreError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))
    }

    /// Query one page of a database, optionally continuing from a cursor
    pub async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<Value, StoreError> {
        let url = format!("{}/databases/{}/query", self.endpoint, database_id);
        let mut body = json!({});
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        self.post(&url, &body).await
    }

    /// Create a page with a property map and an initial batch of blocks.
    /// Returns the new page id.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: &Value,
        children: &[Value],
    ) -> Result<String, StoreError> {
        let url = format!("{}/pages", self.endpoint);
        let initial: Vec<Value> = children.iter().take(self.batch_size).cloned().collect();
        let mut body = json!({
            "parent": {"database_id": database_id},
            "properties": properties,
        });
        if !initial.is_empty() {
            body["children"] = Value::Array(initial);
        }
        let result = self.post(&url, &body).await?;
        result
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| StoreError::ParseError("create_page response had no id".to_string()))
    }

    /// Append up to one batch of blocks to an existing page
    pub async fn append_blocks(&self, page_id: &str, children: &[Value]) -> Result<(), StoreError> {
        let url = format!("{}/blocks/{}/children", self.endpoint, page_id);
        let batch: Vec<Value> = children.iter().take(self.batch_size).cloned().collect();
        let body = json!({ "children": batch });
        self.patch(&url, &body).await?;
        Ok(())
    }

    /// Create a page carrying the whole document: exactly one create call
    /// with the first batch, followed by zero or more append calls for the
    /// remainder, in order.
    pub async fn create_page_with_all_blocks(
        &self,
        database_id: &str,
        properties: &Value,
        children: &[Value],
    ) -> Result<String, StoreError> {
        let (initial, appends) = chunk_document(children, self.batch_size);
        let page_id = self.create_page(database_id, properties, initial).await?;

        for batch in appends {
            self.append_blocks(&page_id, batch).await?;
        }

        Ok(page_id)
    }

    /// Scan a database for the content fingerprints of already-synced pages.
    /// Store errors degrade to an empty set: a failed history scan means
    /// duplicates may be re-synced, never that the run aborts.
    pub async fn existing_fingerprints(&self, database_id: &str) -> HashSet<String> {
        let mut fingerprints = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let result = match self.query_database(database_id, cursor.as_deref()).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("History scan failed, continuing without dedup: {}", e);
                    return fingerprints;
                }
            };

            let empty = Vec::new();
            let pages = result
                .get("results")
                .and_then(|v| v.as_array())
                .unwrap_or(&empty);
            for page in pages {
                let props = page.get("properties");
                let title = props
                    .and_then(|p| p.get(PROP_TITLE))
                    .and_then(|v| v.get("title"))
                    .and_then(|v| v.as_array())
                    .and_then(|a| a.first())
                    .and_then(|t| t.pointer("/text/content"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                let sender = props
                    .and_then(|p| p.get(PROP_SENDER))
                    .and_then(|v| v.pointer("/select/name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                let date = props
                    .and_then(|p| p.get(PROP_DATE))
                    .and_then(|v| v.pointer("/date/start"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();

                if !title.is_empty() && !sender.is_empty() && !date.is_empty() {
                    fingerprints.insert(content_fingerprint(title, sender, date));
                }
            }

            let has_more = result
                .get("has_more")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            cursor = result
                .get("next_cursor")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            if !has_more || cursor.is_none() {
                break;
            }
        }

        debug!("History scan found {} existing pages", fingerprints.len());
        fingerprints
    }
}

/// Split a serialized document into the initial create batch and the
/// ordered append batches, each at most `batch_size` blocks.
pub fn chunk_document(children: &[Value], batch_size: usize) -> (&[Value], Vec<&[Value]>) {
    let batch_size = batch_size.max(1);
    let split = children.len().min(batch_size);
    let (initial, rest) = children.split_at(split);
    let appends = rest.chunks(batch_size).collect();
    (initial, appends)
}

/// Build the property map for a synced page
pub fn build_properties(
    subject: &str,
    date_str: &str,
    sender_tag: &str,
    page_type: &str,
    article_url: Option<&str>,
    tickers: &[String],
) -> Value {
    let title: String = subject.chars().take(MAX_TITLE_LEN).collect();
    let mut properties = json!({
        PROP_TITLE: {"title": [{"type": "text", "text": {"content": title}}]},
        PROP_DATE: {"date": {"start": date_str}},
        PROP_SENDER: {"select": {"name": sender_tag.chars().take(100).collect::<String>()}},
        PROP_TYPE: {"select": {"name": page_type}},
    });

    if let Some(url) = article_url.and_then(urls::validate_url) {
        properties[PROP_URL] = json!({"url": url});
    }

    if !tickers.is_empty() {
        let options: Vec<Value> = tickers
            .iter()
            .take(MAX_TICKERS)
            .map(|t| json!({"name": t}))
            .collect();
        properties[PROP_TICKERS] = json!({"multi_select": options});
    }

    properties
}

/// Add the workflow-status property used on the primary database only
pub fn with_pending_status(mut properties: Value) -> Value {
    properties[PROP_STATUS] = json!({"select": {"name": "Pending"}});
    properties
}

/// Final sanitization before storage: re-validate every run link, drop
/// images without an absolute http(s) URL. Blocks are never blanked; a
/// text block always keeps its runs.
pub fn sanitize_blocks(blocks: Vec<Block>) -> Vec<Block> {
    blocks
        .into_iter()
        .filter_map(|mut block| {
            if let Block::Image { url } = &block {
                if url.starts_with("http://") || url.starts_with("https://") {
                    return Some(block);
                }
                return None;
            }

            if let Some(runs) = block.runs_mut() {
                for run in runs.iter_mut() {
                    if let Some(link) = &run.annotations.link {
                        run.annotations.link = urls::validate_url(link);
                    }
                }
            }
            Some(block)
        })
        .collect()
}

/// Serialize one run as a rich-text element
fn run_to_json(run: &Run) -> Value {
    let mut text = json!({"content": run.text});
    if let Some(link) = &run.annotations.link {
        text["link"] = json!({"url": link});
    }
    json!({
        "type": "text",
        "text": text,
        "annotations": {
            "bold": run.annotations.bold,
            "italic": run.annotations.italic,
            "strikethrough": false,
            "underline": run.annotations.underline,
            "code": run.annotations.code,
            "color": run.annotations.color,
        }
    })
}

/// Serialize one block as a store API block object
pub fn block_to_json(block: &Block) -> Value {
    let type_name = block.kind().type_name();
    match block {
        Block::Image { url } => json!({
            "object": "block",
            "type": "image",
            "image": {"type": "external", "external": {"url": url}}
        }),
        _ => {
            let rich_text: Vec<Value> = block
                .runs()
                .unwrap_or_default()
                .iter()
                .map(run_to_json)
                .collect();
            json!({
                "object": "block",
                "type": type_name,
                type_name: {"rich_text": rich_text}
            })
        }
    }
}

/// Serialize a whole document for the store
pub fn blocks_to_json(blocks: &[Block]) -> Vec<Value> {
    blocks.iter().map(block_to_json).collect()
}
