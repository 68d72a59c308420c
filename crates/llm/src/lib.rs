use std::sync::Arc;

mod answer;
mod client;
mod error;
mod http;

pub use answer::{Answer, ChatRequest, extract_answer};
pub use client::{AssistantClient, BoxFuture};
pub use error::{AssistantError, AssistantResult};
pub use http::{AssistantConfig, DEFAULT_ENDPOINT, HttpAssistantClient};

pub fn create_client(config: AssistantConfig) -> AssistantResult<Arc<dyn AssistantClient>> {
    Ok(Arc::new(HttpAssistantClient::new(config)?))
}
