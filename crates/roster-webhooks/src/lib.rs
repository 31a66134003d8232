//! Outbound calls to the automation webhooks.
//!
//! Roster generation itself happens elsewhere: the generation webhook runs
//! an LLM workflow and writes rows straight into the store. This crate only
//! builds the payloads and interprets the replies.

pub mod client;
pub mod error;
pub mod prompt;

pub use client::{AuthOutcome, GenerationRequest, WebhookClient};
pub use error::{Result, WebhookError};
pub use prompt::{PromptContext, PromptTemplate};
