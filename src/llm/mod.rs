pub mod client;

pub use client::ChatClient;

use anyhow::Result;
use async_trait::async_trait;

use crate::conversation::Turn;
use crate::prompt::Prompt;

/// The language-model collaborator. `synthesize` is the initial one-shot
/// call; `continue_chat` replays the full transcript so the reply stays
/// grounded in everything said so far.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn synthesize(&self, prompt: &Prompt) -> Result<String>;

    async fn continue_chat(&self, history: &[Turn], message: &str) -> Result<String>;
}
