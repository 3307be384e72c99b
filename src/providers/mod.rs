/*!
 * Provider implementations for the translation oracle.
 *
 * This module contains the client implementation for the DeepSeek
 * chat-completions API, behind a common trait so the batch translator can
 * be driven by any oracle (including deterministic mocks in tests).
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for translation oracle providers.
///
/// The oracle is an injectable capability: a function from a system
/// instruction plus a numbered-unit payload to a free-text response. The
/// trait is object-safe so callers can hold a `&dyn Provider`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete one request: returns the raw response text
    ///
    /// # Arguments
    /// * `system_prompt` - The fixed system instruction for the request
    /// * `user_content` - The serialized numbered-unit payload
    async fn complete(&self, system_prompt: &str, user_content: &str)
        -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

pub mod deepseek;
