pub mod image;
pub mod llm;
pub mod orchestrator;
pub mod store;
pub mod story;

use async_trait::async_trait;

use crate::error::GenerationError;

/// A text-generation service that turns a prompt into raw reply text.
#[async_trait]
pub trait StoryBackend: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// An image-generation service that returns an image reference for a prompt.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Returns a URL or `data:` URI. Fails when no image came back.
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;
}
