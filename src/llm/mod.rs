//! Text enrichment through an external text generation service

pub mod client;
pub mod enricher;
pub mod prompts;

pub use client::{CompletionRequest, OpenAiClient, TextGenerator};
pub use enricher::Enricher;
