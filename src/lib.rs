//! Resume builder library

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeBuilderError};
pub use form::FormState;
pub use processing::{GeneratedDocument, ResumeGenerator, ResumeRecord};
