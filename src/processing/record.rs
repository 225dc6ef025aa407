//! The structured input to document generation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to lay out one resume. Text fields use "empty means absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    /// Skill name to rating; ratings are rendered as given
    pub skills: BTreeMap<String, u8>,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub job_title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: String,
}

impl ResumeRecord {
    pub fn has_contact(&self) -> bool {
        !self.email.is_empty() || !self.phone.is_empty()
    }
}

impl WorkExperience {
    /// Entries with both a title and a company get a header line and are enriched
    pub fn has_header(&self) -> bool {
        !self.job_title.is_empty() && !self.company.is_empty()
    }
}

impl Project {
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}
