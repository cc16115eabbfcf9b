//! Generative-language provider abstraction and implementations.

pub mod gemini;

use crate::AiError;

/// A single-shot prompt completion provider.
#[async_trait::async_trait]
pub trait PromptProvider: Send + Sync {
    /// Sends one prompt and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Creates a provider from environment variables.
///
/// Reads the API key from `GEMINI_API_KEY` and the model name from
/// `AI_MODEL` (default `gemini-2.0-flash`).
///
/// # Errors
///
/// Returns [`AiError::Config`] if no API key is configured.
pub fn create_provider_from_env() -> Result<Box<dyn PromptProvider>, AiError> {
    let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AiError::Config {
        message: "GEMINI_API_KEY environment variable not set".to_string(),
    })?;
    let model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());

    log::info!("Using generative-language model {model}");

    Ok(Box::new(gemini::GeminiProvider::new(api_key, model)))
}
