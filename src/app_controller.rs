use anyhow::Result;
use chrono::{Local, TimeZone};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::email::{
    self, content_fingerprint, extract_article_url, extract_sender_tag, EmailMessage,
    MessageSource,
};
use crate::html::html_to_blocks;
use crate::notion::{self, NotionClient};
use crate::providers::deepseek::DeepSeek;
use crate::tickers::extract_tickers;
use crate::translation::BatchTranslator;

// @module: Application controller for the newsletter sync run

/// Summary of one sync run
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncSummary {
    /// Messages fetched from the source
    pub fetched: usize,
    /// Pages created in the primary database
    pub synced: usize,
    /// Messages skipped (welcome mails, history duplicates)
    pub skipped: usize,
}

/// Main application controller for the newsletter sync
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the full sync: scan history, fetch messages, convert each body
    /// to a block document, translate, and persist. A failure on one
    /// message never aborts the rest of the run.
    pub async fn run(&self, source: &dyn MessageSource) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        info!(
            "Translation: {}",
            if self.config.translation.is_active() {
                "Enabled (DeepSeek)"
            } else {
                "Disabled"
            }
        );
        info!("Max messages to fetch: {}", self.config.sync.max_messages);

        let store = NotionClient::new(&self.config.store);
        let secondary = NotionClient::secondary(&self.config.store);
        if secondary.is_some() {
            info!("Secondary database: enabled");
        }

        let mut existing = store
            .existing_fingerprints(&self.config.store.database_id)
            .await;
        info!("Existing articles in store: {}", existing.len());

        let messages = source.fetch(self.config.sync.max_messages).await?;
        summary.fetched = messages.len();
        info!("Fetched {} messages", messages.len());

        let provider = if self.config.translation.is_active() {
            Some(DeepSeek::new(
                self.config.translation.api_key.clone(),
                self.config.translation.endpoint.clone(),
                self.config.translation.model.clone(),
                self.config.translation.temperature,
                self.config.translation.max_tokens,
                self.config.translation.timeout_secs,
            ))
        } else {
            None
        };

        for message in &messages {
            match self
                .sync_message(message, &store, secondary.as_ref(), provider.as_ref(), &mut existing)
                .await
            {
                Ok(true) => summary.synced += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    error!(
                        "Error processing message '{}': {}",
                        truncate_for_log(&message.subject),
                        e
                    );
                }
            }
        }

        info!("Sync completed: added {} new articles", summary.synced);
        Ok(summary)
    }

    /// Process one message. Returns Ok(true) when a page was created,
    /// Ok(false) when the message was skipped.
    async fn sync_message(
        &self,
        message: &EmailMessage,
        store: &NotionClient,
        secondary: Option<&NotionClient>,
        provider: Option<&DeepSeek>,
        existing: &mut std::collections::HashSet<String>,
    ) -> Result<bool> {
        let subject = &message.subject;
        let sender_tag = extract_sender_tag(&message.from);

        if email::is_welcome_email(subject) {
            info!("[SKIP] Welcome email: {}", truncate_for_log(subject));
            return Ok(false);
        }

        let date_str = self.format_message_date(message);

        let fingerprint = content_fingerprint(subject, &sender_tag, &date_str);
        if existing.contains(&fingerprint) {
            info!("[SKIP] Duplicate: {}", truncate_for_log(subject));
            return Ok(false);
        }

        let article_url = extract_article_url(&message.body_text)
            .or_else(|| extract_article_url(&message.body_html));

        let page_type = if email::is_chat_thread(subject, article_url.as_deref()) {
            "Chat"
        } else {
            "Article"
        };

        let mut blocks = html_to_blocks(&message.body_html);

        if let Some(provider) = provider {
            if !blocks.is_empty() {
                let translator = BatchTranslator::new(provider, &self.config.translation);
                translator.translate_document(&mut blocks).await;
            }
        }

        let tickers = extract_tickers(subject, &message.body_html);

        let properties = notion::build_properties(
            subject,
            &date_str,
            &sender_tag,
            page_type,
            article_url.as_deref(),
            &tickers,
        );

        let blocks = notion::sanitize_blocks(blocks);
        let children = notion::blocks_to_json(&blocks);

        // Primary database carries the workflow status; the secondary copy
        // does not
        let primary_properties = notion::with_pending_status(properties.clone());

        let page_id = store
            .create_page_with_all_blocks(
                &self.config.store.database_id,
                &primary_properties,
                &children,
            )
            .await?;
        info!("[DB1] Synced: {} ({})", truncate_for_log(subject), page_id);
        existing.insert(fingerprint);

        if let Some(secondary) = secondary {
            match secondary
                .create_page_with_all_blocks(
                    &self.config.store.secondary_database_id,
                    &properties,
                    &children,
                )
                .await
            {
                Ok(_) => info!("[DB2] Synced: {}", truncate_for_log(subject)),
                Err(e) => warn!("[DB2] Failed: {} - {}", truncate_for_log(subject), e),
            }
        }

        Ok(true)
    }

    /// Resolve a message's date to ISO minute precision: provider receive
    /// timestamp first, then the Date header, then now.
    fn format_message_date(&self, message: &EmailMessage) -> String {
        let parsed = message
            .internal_date
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .or_else(|| {
                chrono::DateTime::parse_from_rfc2822(&message.date)
                    .ok()
                    .map(|dt| dt.with_timezone(&Local))
            })
            .unwrap_or_else(Local::now);
        parsed.format("%Y-%m-%dT%H:%M").to_string()
    }
}

/// Shorten a subject for log lines
fn truncate_for_log(subject: &str) -> String {
    let truncated: String = subject.chars().take(50).collect();
    if truncated.len() < subject.len() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
