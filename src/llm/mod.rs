//! Chat model integration module

pub mod client;
pub mod prompts;

pub use client::{ChatClient, ChatReply};
pub use prompts::{PromptParams, PromptTemplate, PromptTemplates};
