use crate::core::error::AitripError;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One backend integration: builds the vendor payload and headers, performs
/// the single POST, and extracts the reply text from the vendor response.
#[async_trait]
pub trait PlanProvider: Send + Sync + std::fmt::Debug {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError>;
}

pub mod base_client;
pub mod ernie;
pub mod factory;
pub mod gemini;
pub mod openai_compatible;
pub mod qwen;
pub mod simulator;
pub mod spark;
