use std::future::Future;
use std::pin::Pin;

use super::answer::Answer;
use super::error::AssistantResult;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One-shot question/answer exchange with the remote assistant.
///
/// Implementations perform exactly one attempt per call; retry policy, if any,
/// belongs to the caller.
pub trait AssistantClient: Send + Sync {
    fn endpoint(&self) -> &str;
    fn ask<'a>(&'a self, question: &'a str) -> BoxFuture<'a, AssistantResult<Answer>>;
}
