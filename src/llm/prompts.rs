//! Prompt construction for the disaster-response chatbot.
//!
//! Every request carries exactly two messages: a fixed system role and a
//! user message that appends the reference document text to the question.
//! No conversation history is kept between questions.

use super::client::ChatMessage;

/// System role sent with every question.
pub const SYSTEM_PROMPT: &str = "You are a disaster response agent. Be descriptive and helpful.";

/// Join the user's question with the extracted document text.
pub fn build_combined_prompt(question: &str, document: &str) -> String {
    format!("{question}\n\nDocument Content:\n{document}")
}

/// Build the `[system, user]` message pair for a question.
pub fn build_chat_messages(question: &str, document: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_combined_prompt(question, document)),
    ]
}
