//! Narrative enrichment on top of a text generation backend

use crate::config::EnrichmentConfig;
use crate::error::{Result, ResumeBuilderError};
use crate::llm::client::{CompletionRequest, TextGenerator};
use crate::llm::prompts::PromptTemplates;
use crate::processing::record::{Project, WorkExperience};
use log::debug;
use std::time::Instant;

pub struct Enricher {
    generator: Box<dyn TextGenerator>,
    templates: PromptTemplates,
    max_tokens: u32,
    temperature: f32,
}

impl Enricher {
    pub fn new(generator: Box<dyn TextGenerator>, config: &EnrichmentConfig) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Generate text for `instruction` with `context` (the job profile) in the system directive.
    ///
    /// Exactly one call is made. The completion is returned as the service produced it,
    /// and every failure comes back as `ResumeBuilderError::Service`.
    pub async fn enrich(&self, instruction: &str, context: &str) -> Result<String> {
        let request = CompletionRequest {
            system: self.templates.render_system(context),
            user: instruction.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(
            "Enrichment call to {}: instruction {} chars, context {} chars",
            self.generator.model_name(),
            instruction.len(),
            context.len()
        );
        let start = Instant::now();
        let text = self.generator.complete(&request).await.map_err(|e| match e {
            ResumeBuilderError::Service(_) => e,
            other => ResumeBuilderError::Service(other.to_string()),
        })?;
        debug!(
            "Enrichment returned {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    pub async fn enrich_summary(&self, job_profile: &str) -> Result<String> {
        self.enrich(&self.templates.render_summary(), job_profile).await
    }

    pub async fn enrich_work(&self, work: &WorkExperience, job_profile: &str) -> Result<String> {
        self.enrich(&self.templates.render_work(work), job_profile).await
    }

    pub async fn enrich_project(&self, project: &Project, job_profile: &str) -> Result<String> {
        self.enrich(&self.templates.render_project(project), job_profile)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Recording {
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        reply: std::result::Result<String, String>,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .map_err(ResumeBuilderError::InvalidInput)
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn enricher(reply: std::result::Result<String, String>) -> (Enricher, Arc<Mutex<Vec<CompletionRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let generator = Recording {
            requests: Arc::clone(&requests),
            reply,
        };
        (
            Enricher::new(Box::new(generator), &EnrichmentConfig::default()),
            requests,
        )
    }

    #[tokio::test]
    async fn test_enrich_sends_one_request_with_context() {
        let (enricher, requests) = enricher(Ok("Sharp summary".to_string()));

        let text = enricher
            .enrich("Write a summary", "Platform engineer")
            .await
            .unwrap();
        assert_eq!(text, "Sharp summary");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user, "Write a summary");
        assert!(requests[0].system.contains("Platform engineer"));
        assert_eq!(requests[0].max_tokens, 1000);
        assert!((requests[0].temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_identical_calls_are_not_cached() {
        let (enricher, requests) = enricher(Ok("text".to_string()));
        enricher.enrich_summary("profile").await.unwrap();
        enricher.enrich_summary("profile").await.unwrap();
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_any_failure_becomes_service_error() {
        let (enricher, _) = enricher(Err("socket closed".to_string()));
        let err = enricher.enrich("x", "y").await.unwrap_err();
        assert!(err.is_service_error());
        assert!(err.to_string().contains("socket closed"));
    }
}
