//! The two MapMarks AI flows: event summarization and assistant chat.
//!
//! Each flow renders a fixed prompt template and makes exactly one
//! provider call.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::AiError;
use crate::providers::PromptProvider;

/// Minimum description length accepted by the summarization flow.
///
/// Shorter inputs are rejected before any network call; there is nothing
/// useful to condense.
pub const MIN_SUMMARIZE_LEN: usize = 20;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    /// The human user.
    User,
    /// The assistant.
    Model,
}

/// A single message in the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

/// Input to the chat flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Prior conversation, oldest first.
    pub history: Vec<ChatMessage>,
    /// The user's current message.
    pub message: String,
}

/// Output of the chat flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// The assistant's response, in Markdown.
    pub reply: String,
}

/// Output of the summarization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// A concise summary of the event details.
    pub summary: String,
}

/// Summarizes a detailed event description into a concise one.
///
/// # Errors
///
/// Returns [`AiError::InvalidInput`] for descriptions shorter than
/// [`MIN_SUMMARIZE_LEN`] characters, or the provider's error if the call
/// fails.
pub async fn summarize_event_details(
    provider: &dyn PromptProvider,
    event_details: &str,
) -> Result<EventSummary, AiError> {
    let trimmed = event_details.trim();
    if trimmed.chars().count() < MIN_SUMMARIZE_LEN {
        return Err(AiError::InvalidInput {
            message: format!(
                "Description must be at least {MIN_SUMMARIZE_LEN} characters to summarize"
            ),
        });
    }

    let prompt = render_summarize_prompt(trimmed);
    let summary = provider.generate(&prompt).await?;

    Ok(EventSummary {
        summary: summary.trim().to_string(),
    })
}

/// Continues the assistant conversation with one new user message.
///
/// # Errors
///
/// Returns the provider's error if the call fails.
pub async fn chat(
    provider: &dyn PromptProvider,
    request: &ChatRequest,
) -> Result<ChatReply, AiError> {
    let prompt = render_chat_prompt(&request.history, &request.message);
    let reply = provider.generate(&prompt).await?;

    Ok(ChatReply {
        reply: reply.trim().to_string(),
    })
}

/// Renders the summarization prompt.
fn render_summarize_prompt(event_details: &str) -> String {
    format!(
        "Summarize the following event details into a concise description:\n\
         \n\
         Event Details:\n\
         {event_details}"
    )
}

/// Renders the chat prompt: a role-tagged transcript of the history
/// followed by the current message.
fn render_chat_prompt(history: &[ChatMessage], message: &str) -> String {
    let mut prompt = String::from(
        "You are a helpful assistant for the MapMarks application.\n\
         Your responses should be in Markdown format.\n\
         \n\
         Here is the conversation history:\n",
    );

    for entry in history {
        prompt.push_str(&format!("**{}**: {}\n", entry.role, entry.content));
    }

    prompt.push_str(&format!("\n**user**: {message}\n**model**:"));
    prompt
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Provider returning a canned reply and recording the prompt.
    struct CannedProvider {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PromptProvider for CannedProvider {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn summarize_rejects_short_input_without_calling_provider() {
        let provider = CannedProvider::new("unused");
        let result = summarize_event_details(&provider, "too short").await;

        assert!(matches!(result, Err(AiError::InvalidInput { .. })));
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summarize_renders_details_into_the_prompt() {
        let provider = CannedProvider::new("Flooded road near the bus stand.");
        let details = "Heavy rains since last night have flooded the main road.";

        let summary = summarize_event_details(&provider, details).await.unwrap();
        assert_eq!(summary.summary, "Flooded road near the bus stand.");

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("Summarize the following event details"));
        assert!(prompts[0].contains(details));
    }

    #[tokio::test]
    async fn chat_renders_history_in_order() {
        let provider = CannedProvider::new("**Hi again!**");
        let request = ChatRequest {
            history: vec![
                ChatMessage {
                    role: ChatRole::User,
                    content: "hello".to_string(),
                },
                ChatMessage {
                    role: ChatRole::Model,
                    content: "Hi! How can I help?".to_string(),
                },
            ],
            message: "what can you do?".to_string(),
        };

        let reply = chat(&provider, &request).await.unwrap();
        assert_eq!(reply.reply, "**Hi again!**");

        let prompts = provider.prompts.lock().unwrap();
        let prompt = &prompts[0];
        let user_pos = prompt.find("**user**: hello").unwrap();
        let model_pos = prompt.find("**model**: Hi! How can I help?").unwrap();
        let current_pos = prompt.find("**user**: what can you do?").unwrap();
        assert!(user_pos < model_pos && model_pos < current_pos);
        assert!(prompt.ends_with("**model**:"));
    }

    #[test]
    fn chat_roles_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Model).unwrap(),
            "\"model\""
        );
        assert_eq!(ChatRole::User.to_string(), "user");
    }
}
