//! The generation pipeline: form state to finished PDF
//!
//! Enrichment calls run one after another (summary, then work entries, then
//! projects); each must finish before the next starts.

use crate::config::Config;
use crate::error::{Result, ResumeBuilderError};
use crate::form::state::FormState;
use crate::llm::{Enricher, OpenAiClient};
use crate::output::{PdfRenderer, DEFAULT_FILE_NAME, PDF_MIME_TYPE};
use crate::processing::blocks::build;
use crate::processing::record::ResumeRecord;
use log::{info, warn};
use std::time::Instant;

/// What to do when an enrichment call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentPolicy {
    /// Abort generation with the service error
    Strict,
    /// Keep the user's raw text for that field and carry on
    FallbackToRaw,
}

impl EnrichmentPolicy {
    pub fn from_fallback(fallback_to_raw: bool) -> Self {
        if fallback_to_raw {
            EnrichmentPolicy::FallbackToRaw
        } else {
            EnrichmentPolicy::Strict
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

pub struct ResumeGenerator {
    enricher: Option<Enricher>,
    policy: EnrichmentPolicy,
    renderer: PdfRenderer,
    file_name: String,
}

impl ResumeGenerator {
    /// A generator that uses the form text as-is
    pub fn new(renderer: PdfRenderer) -> Self {
        Self {
            enricher: None,
            policy: EnrichmentPolicy::Strict,
            renderer,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_enricher(mut self, enricher: Enricher, policy: EnrichmentPolicy) -> Self {
        self.enricher = Some(enricher);
        self.policy = policy;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Build a generator from configuration, talking to the configured service when `enrich` is set
    pub fn from_config(config: &Config, enrich: bool) -> Result<Self> {
        let generator = Self::new(PdfRenderer::new(config.document.title.as_str()))
            .with_file_name(config.document.output_file.as_str());
        if !enrich {
            return Ok(generator);
        }

        let client = OpenAiClient::from_config(&config.enrichment, config.api_key()?)?;
        let enricher = Enricher::new(Box::new(client), &config.enrichment);
        Ok(generator.with_enricher(
            enricher,
            EnrichmentPolicy::from_fallback(config.enrichment.fallback_to_raw),
        ))
    }

    pub fn is_enriching(&self) -> bool {
        self.enricher.is_some()
    }

    /// Number of service calls `assemble_record` will make for this form
    pub fn planned_calls(&self, form: &FormState) -> usize {
        if self.enricher.is_none() {
            return 0;
        }
        let record = form.to_record();
        1 + record.work_experience.iter().filter(|w| w.has_header()).count()
            + record.projects.iter().filter(|p| p.is_named()).count()
    }

    /// Build the record for this form, enriching the narrative fields when an enricher is set
    pub async fn assemble_record(&self, form: &FormState) -> Result<ResumeRecord> {
        let mut record = form.to_record();
        let Some(enricher) = &self.enricher else {
            return Ok(record);
        };

        let profile = form.job_profile.trim();
        info!("Enriching resume content with {}", enricher.model_name());

        let summary = enricher.enrich_summary(profile).await;
        record.summary = self.resolve(summary, &record.summary, "summary")?;

        for work in record
            .work_experience
            .iter_mut()
            .filter(|w| w.has_header())
        {
            let enriched = enricher.enrich_work(work, profile).await;
            let field = format!("work experience '{}'", work.job_title);
            work.description = self.resolve(enriched, &work.description, &field)?;
        }

        for project in record.projects.iter_mut().filter(|p| p.is_named()) {
            let enriched = enricher.enrich_project(project, profile).await;
            let field = format!("project '{}'", project.name);
            project.description = self.resolve(enriched, &project.description, &field)?;
        }

        Ok(record)
    }

    fn resolve(&self, enriched: Result<String>, raw: &str, field: &str) -> Result<String> {
        match enriched {
            Ok(text) => Ok(text.trim().to_string()),
            Err(ResumeBuilderError::Service(message))
                if self.policy == EnrichmentPolicy::FallbackToRaw =>
            {
                warn!("Enrichment of {} failed, keeping original text: {}", field, message);
                Ok(raw.to_string())
            }
            Err(e) => Err(e),
        }
    }

    /// Lay out and render an already assembled record
    pub fn render_record(&self, record: &ResumeRecord) -> Result<Vec<u8>> {
        let blocks = build(record);
        self.renderer.render(&blocks)
    }

    pub async fn generate(&self, form: &FormState) -> Result<GeneratedDocument> {
        let start = Instant::now();
        let record = self.assemble_record(form).await?;
        let bytes = self.render_record(&record)?;
        info!(
            "Generated {} ({} bytes) in {}ms",
            self.file_name,
            bytes.len(),
            start.elapsed().as_millis()
        );

        Ok(GeneratedDocument {
            bytes,
            file_name: self.file_name.clone(),
            mime_type: PDF_MIME_TYPE,
        })
    }
}
