//! Prompt templates for resume enrichment

use crate::processing::record::{Project, WorkExperience};

/// Templates use `{placeholder}` substitution
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub summary: String,
    pub work: String,
    pub project: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: SYSTEM_TEMPLATE.to_string(),
            summary: SUMMARY_INSTRUCTION.to_string(),
            work: WORK_TEMPLATE.to_string(),
            project: PROJECT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// System directive with the target job profile embedded
    pub fn render_system(&self, job_profile: &str) -> String {
        fill(&self.system, &[("job_profile", job_profile)])
    }

    pub fn render_summary(&self) -> String {
        self.summary.clone()
    }

    pub fn render_work(&self, work: &WorkExperience) -> String {
        fill(
            &self.work,
            &[
                ("job_title", work.job_title.as_str()),
                ("company", work.company.as_str()),
                ("description", work.description.as_str()),
            ],
        )
    }

    pub fn render_project(&self, project: &Project) -> String {
        fill(
            &self.project,
            &[("name", project.name.as_str()), ("description", project.description.as_str())],
        )
    }
}

/// Substitute `{key}` placeholders in one pass over the template.
/// Substituted values are never scanned again; unknown placeholders stay literal.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

const SYSTEM_TEMPLATE: &str = "You are a highly skilled resume assistant. Your task is to help users create resumes tailored \
to specific job descriptions. The job profile provided is: {job_profile}
Consider the role, responsibilities, and key skills described in the job profile \
when refining the resume.";

const SUMMARY_INSTRUCTION: &str =
    "Create the Overall Summary of the resume and make it short, precise and to the point";

const WORK_TEMPLATE: &str = "Refine the job description for the role '{job_title}' at '{company}'. \
Details: {description} then return overview, Key Responsibilities, Impact and technologies used \
in points and make it shorter and precise";

const PROJECT_TEMPLATE: &str = "Refine the project description for the project '{name}'. \
Details: {description} then return overview, My Contribution, Impact and Tools Used \
in points and make it shorter and precise";
