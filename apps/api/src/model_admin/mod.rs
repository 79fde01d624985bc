//! Conversation-model administration — lifecycle management for the remote
//! model configuration (system prompt, provider, bounds) that parameterizes
//! conversational search.

pub mod handlers;
pub mod lifecycle;
pub mod prompts;
