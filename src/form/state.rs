//! Explicit form state and the pure list operations that edit it
//!
//! Every operation takes the current state by reference and returns a new
//! value; nothing here mutates shared state or touches the generation core.

use crate::error::{Result, ResumeBuilderError};
use crate::processing::record::{Education, Project, ResumeRecord, WorkExperience};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub const MIN_SKILL_SCORE: u8 = 1;
pub const MAX_SKILL_SCORE: u8 = 10;
pub const DEFAULT_SKILL_SCORE: u8 = 5;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex")
});
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+()\-./ ]+$").expect("Invalid phone regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub personal: PersonalInfo,
    /// Target job description used as context for every enrichment call
    pub job_profile: String,
    pub experience_level: ExperienceLevel,
    pub skills: Vec<SkillEntry>,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkEntry>,
    pub projects: Vec<ProjectEntry>,
    pub hobbies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Fresher,
    Experienced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default = "default_score")]
    pub score: u8,
}

fn default_score() -> u8 {
    DEFAULT_SKILL_SCORE
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkEntry {
    pub job_title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: String,
}

/// The repeatable sections of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSection {
    Skills,
    Education,
    Experience,
    Projects,
    Hobbies,
}

impl fmt::Display for FormSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormSection::Skills => write!(f, "skills"),
            FormSection::Education => write!(f, "education"),
            FormSection::Experience => write!(f, "experience"),
            FormSection::Projects => write!(f, "projects"),
            FormSection::Hobbies => write!(f, "hobbies"),
        }
    }
}

impl FromStr for FormSection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skill" | "skills" => Ok(FormSection::Skills),
            "education" | "educations" => Ok(FormSection::Education),
            "experience" | "work" | "work_experience" => Ok(FormSection::Experience),
            "project" | "projects" => Ok(FormSection::Projects),
            "hobby" | "hobbies" => Ok(FormSection::Hobbies),
            _ => Err(format!(
                "Invalid section: {}. Supported: skills, education, experience, projects, hobbies",
                s
            )),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fresher" => Ok(ExperienceLevel::Fresher),
            "experienced" => Ok(ExperienceLevel::Experienced),
            _ => Err(format!(
                "Invalid experience level: {}. Supported: fresher, experienced",
                s
            )),
        }
    }
}

/// Append an item at the end of a list
pub fn append<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = items.to_vec();
    next.push(item);
    next
}

/// Remove the item at `index`
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Result<Vec<T>> {
    check_index(items.len(), index)?;
    let mut next = items.to_vec();
    next.remove(index);
    Ok(next)
}

/// Replace the item at `index`
pub fn replace_at<T: Clone>(items: &[T], index: usize, item: T) -> Result<Vec<T>> {
    check_index(items.len(), index)?;
    let mut next = items.to_vec();
    next[index] = item;
    Ok(next)
}

fn check_index(len: usize, index: usize) -> Result<()> {
    if index >= len {
        return Err(ResumeBuilderError::InvalidInput(format!(
            "Index {} is out of range (section has {} entries)",
            index, len
        )));
    }
    Ok(())
}

fn check_score(score: u8) -> Result<()> {
    if !(MIN_SKILL_SCORE..=MAX_SKILL_SCORE).contains(&score) {
        return Err(ResumeBuilderError::InvalidInput(format!(
            "Skill score must be between {} and {}, got {}",
            MIN_SKILL_SCORE, MAX_SKILL_SCORE, score
        )));
    }
    Ok(())
}

impl FormState {
    /// A starter form with one empty entry per repeatable section
    pub fn template() -> Self {
        Self {
            education: vec![EducationEntry::default()],
            work_experience: vec![WorkEntry::default()],
            projects: vec![ProjectEntry::default()],
            ..Self::default()
        }
    }

    pub fn with_personal(&self, personal: PersonalInfo) -> Self {
        Self {
            personal,
            ..self.clone()
        }
    }

    pub fn with_job_profile(&self, job_profile: impl Into<String>) -> Self {
        Self {
            job_profile: job_profile.into(),
            ..self.clone()
        }
    }

    pub fn with_experience_level(&self, experience_level: ExperienceLevel) -> Self {
        Self {
            experience_level,
            ..self.clone()
        }
    }

    pub fn add_skill(&self, name: impl Into<String>, score: u8) -> Result<Self> {
        check_score(score)?;
        let skill = SkillEntry {
            name: name.into(),
            score,
        };
        Ok(Self {
            skills: append(&self.skills, skill),
            ..self.clone()
        })
    }

    pub fn edit_skill(&self, index: usize, name: impl Into<String>, score: u8) -> Result<Self> {
        check_score(score)?;
        let skill = SkillEntry {
            name: name.into(),
            score,
        };
        Ok(Self {
            skills: replace_at(&self.skills, index, skill)?,
            ..self.clone()
        })
    }

    pub fn add_education(&self, entry: EducationEntry) -> Self {
        Self {
            education: append(&self.education, entry),
            ..self.clone()
        }
    }

    pub fn edit_education(&self, index: usize, entry: EducationEntry) -> Result<Self> {
        Ok(Self {
            education: replace_at(&self.education, index, entry)?,
            ..self.clone()
        })
    }

    pub fn add_work(&self, entry: WorkEntry) -> Self {
        Self {
            work_experience: append(&self.work_experience, entry),
            ..self.clone()
        }
    }

    pub fn edit_work(&self, index: usize, entry: WorkEntry) -> Result<Self> {
        Ok(Self {
            work_experience: replace_at(&self.work_experience, index, entry)?,
            ..self.clone()
        })
    }

    pub fn add_project(&self, entry: ProjectEntry) -> Self {
        Self {
            projects: append(&self.projects, entry),
            ..self.clone()
        }
    }

    pub fn edit_project(&self, index: usize, entry: ProjectEntry) -> Result<Self> {
        Ok(Self {
            projects: replace_at(&self.projects, index, entry)?,
            ..self.clone()
        })
    }

    /// Blank hobbies are ignored
    pub fn add_hobby(&self, hobby: impl Into<String>) -> Self {
        let hobby = hobby.into();
        if hobby.trim().is_empty() {
            return self.clone();
        }
        Self {
            hobbies: append(&self.hobbies, hobby),
            ..self.clone()
        }
    }

    pub fn remove(&self, section: FormSection, index: usize) -> Result<Self> {
        let mut next = self.clone();
        match section {
            FormSection::Skills => next.skills = remove_at(&self.skills, index)?,
            FormSection::Education => next.education = remove_at(&self.education, index)?,
            FormSection::Experience => {
                next.work_experience = remove_at(&self.work_experience, index)?
            }
            FormSection::Projects => next.projects = remove_at(&self.projects, index)?,
            FormSection::Hobbies => next.hobbies = remove_at(&self.hobbies, index)?,
        }
        Ok(next)
    }

    pub fn section_len(&self, section: FormSection) -> usize {
        match section {
            FormSection::Skills => self.skills.len(),
            FormSection::Education => self.education.len(),
            FormSection::Experience => self.work_experience.len(),
            FormSection::Projects => self.projects.len(),
            FormSection::Hobbies => self.hobbies.len(),
        }
    }

    /// Non-fatal problems worth showing to the user before generating
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let personal = &self.personal;
        if personal.name.trim().is_empty() {
            warnings.push("Name is empty".to_string());
        }
        if !personal.email.trim().is_empty() && !EMAIL_REGEX.is_match(personal.email.trim()) {
            warnings.push(format!("Email does not look valid: {}", personal.email));
        }
        if !personal.phone.trim().is_empty() && !PHONE_REGEX.is_match(personal.phone.trim()) {
            warnings.push(format!("Phone number does not look valid: {}", personal.phone));
        }
        for (i, skill) in self.skills.iter().enumerate() {
            if skill.name.trim().is_empty() {
                warnings.push(format!("Skill {} has no name and will be skipped", i + 1));
            }
            if check_score(skill.score).is_err() {
                warnings.push(format!(
                    "Skill '{}' has score {} outside {}..={}",
                    skill.name, skill.score, MIN_SKILL_SCORE, MAX_SKILL_SCORE
                ));
            }
        }
        if self.experience_level == ExperienceLevel::Fresher
            && self.work_experience.iter().any(|w| !w.is_blank())
        {
            warnings.push(
                "Work experience is ignored while the experience level is 'fresher'".to_string(),
            );
        }
        warnings
    }

    /// Build a record from the raw form text, without any enrichment
    pub fn to_record(&self) -> ResumeRecord {
        let personal = &self.personal;

        let mut skills = BTreeMap::new();
        for skill in &self.skills {
            let name = skill.name.trim();
            if !name.is_empty() {
                skills.insert(name.to_string(), skill.score);
            }
        }

        let education = self
            .education
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| Education {
                degree: e.degree.trim().to_string(),
                institution: e.institution.trim().to_string(),
                year: e.year.trim().to_string(),
            })
            .collect();

        let work_experience = match self.experience_level {
            ExperienceLevel::Fresher => Vec::new(),
            ExperienceLevel::Experienced => self
                .work_experience
                .iter()
                .filter(|w| !w.is_blank())
                .map(|w| WorkExperience {
                    job_title: w.job_title.trim().to_string(),
                    company: w.company.trim().to_string(),
                    duration: w.duration.trim().to_string(),
                    description: w.description.trim().to_string(),
                })
                .collect(),
        };

        let projects = self
            .projects
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| Project {
                name: p.name.trim().to_string(),
                description: p.description.trim().to_string(),
                technologies: p.technologies.trim().to_string(),
                link: p.link.trim().to_string(),
            })
            .collect();

        ResumeRecord {
            name: personal.name.trim().to_string(),
            job_title: personal.job_title.trim().to_string(),
            email: personal.email.trim().to_string(),
            phone: personal.phone.trim().to_string(),
            summary: personal.summary.trim().to_string(),
            skills,
            education,
            work_experience,
            projects,
        }
    }
}

impl EducationEntry {
    pub fn is_blank(&self) -> bool {
        self.degree.trim().is_empty()
            && self.institution.trim().is_empty()
            && self.year.trim().is_empty()
    }
}

impl WorkEntry {
    pub fn is_blank(&self) -> bool {
        self.job_title.trim().is_empty()
            && self.company.trim().is_empty()
            && self.duration.trim().is_empty()
            && self.description.trim().is_empty()
    }
}

impl ProjectEntry {
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.description.trim().is_empty()
            && self.technologies.trim().is_empty()
            && self.link.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(title: &str, company: &str) -> WorkEntry {
        WorkEntry {
            job_title: title.to_string(),
            company: company.to_string(),
            duration: "2021 - 2023".to_string(),
            description: "Shipped things".to_string(),
        }
    }

    #[test]
    fn test_append_and_remove_are_pure() {
        let items = vec!["a".to_string(), "b".to_string()];
        let appended = append(&items, "c".to_string());
        assert_eq!(items.len(), 2);
        assert_eq!(appended, vec!["a", "b", "c"]);

        let removed = remove_at(&appended, 0).unwrap();
        assert_eq!(removed, vec!["b", "c"]);
        assert_eq!(appended.len(), 3);
    }

    #[test]
    fn test_remove_out_of_range() {
        let items: Vec<u8> = vec![1];
        assert!(matches!(
            remove_at(&items, 1),
            Err(ResumeBuilderError::InvalidInput(_))
        ));
        assert!(replace_at(&items, 3, 9).is_err());
    }

    #[test]
    fn test_skill_score_range_enforced() {
        let form = FormState::default();
        assert!(form.add_skill("Rust", 0).is_err());
        assert!(form.add_skill("Rust", 11).is_err());

        let form = form.add_skill("Rust", 10).unwrap();
        assert_eq!(form.skills.len(), 1);
        assert!(form.edit_skill(0, "Rust", 12).is_err());

        let edited = form.edit_skill(0, "Go", 4).unwrap();
        assert_eq!(edited.skills[0].name, "Go");
        assert_eq!(edited.skills[0].score, 4);
    }

    #[test]
    fn test_blank_hobby_ignored() {
        let form = FormState::default().add_hobby("   ");
        assert!(form.hobbies.is_empty());

        let form = form.add_hobby("Chess").add_hobby("Climbing");
        assert_eq!(form.hobbies, vec!["Chess", "Climbing"]);

        let form = form.remove(FormSection::Hobbies, 0).unwrap();
        assert_eq!(form.hobbies, vec!["Climbing"]);
    }

    #[test]
    fn test_remove_by_section() {
        let form = FormState::template()
            .add_work(work("Engineer", "Acme"))
            .add_project(ProjectEntry {
                name: "Atlas".to_string(),
                ..ProjectEntry::default()
            });

        assert_eq!(form.section_len(FormSection::Experience), 2);
        let form = form.remove(FormSection::Experience, 0).unwrap();
        assert_eq!(form.work_experience[0].company, "Acme");

        let form = form.remove(FormSection::Projects, 1).unwrap();
        assert_eq!(form.projects.len(), 1);
        assert!(form.remove(FormSection::Skills, 0).is_err());
    }

    #[test]
    fn test_section_parsing() {
        assert_eq!("Skills".parse::<FormSection>().unwrap(), FormSection::Skills);
        assert_eq!("work".parse::<FormSection>().unwrap(), FormSection::Experience);
        assert!("awards".parse::<FormSection>().is_err());
        assert_eq!(
            "Experienced".parse::<ExperienceLevel>().unwrap(),
            ExperienceLevel::Experienced
        );
    }

    #[test]
    fn test_to_record_filters_and_dedups_skills() {
        let form = FormState::default()
            .add_skill("Rust", 8)
            .unwrap()
            .add_skill("  ", 3)
            .unwrap()
            .add_skill("Rust", 9)
            .unwrap()
            .add_skill("Go", 4)
            .unwrap();

        let record = form.to_record();
        assert_eq!(record.skills.len(), 2);
        assert_eq!(record.skills.get("Rust"), Some(&9));
        assert_eq!(record.skills.get("Go"), Some(&4));
    }

    #[test]
    fn test_to_record_drops_blank_entries() {
        let form = FormState::template()
            .with_experience_level(ExperienceLevel::Experienced)
            .add_education(EducationEntry {
                degree: "BS CS".to_string(),
                institution: "MIT".to_string(),
                year: "2020".to_string(),
            })
            .add_work(work("Engineer", "Acme"));

        let record = form.to_record();
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.work_experience.len(), 1);
        assert!(record.projects.is_empty());
    }

    #[test]
    fn test_fresher_excludes_work_experience() {
        let form = FormState::default().add_work(work("Engineer", "Acme"));
        assert!(form.to_record().work_experience.is_empty());
        assert!(form
            .validate()
            .iter()
            .any(|w| w.contains("experience level")));

        let experienced = form.with_experience_level(ExperienceLevel::Experienced);
        assert_eq!(experienced.to_record().work_experience.len(), 1);
    }

    #[test]
    fn test_validate_flags_contact_details() {
        let form = FormState::default().with_personal(PersonalInfo {
            name: "Jane Doe".to_string(),
            email: "not-an-email".to_string(),
            phone: "call me".to_string(),
            ..PersonalInfo::default()
        });

        let warnings = form.validate();
        assert_eq!(warnings.len(), 2);

        let fixed = form.with_personal(PersonalInfo {
            name: "Jane Doe".to_string(),
            email: "j@x.com".to_string(),
            phone: "+1 (555) 010-2030".to_string(),
            ..PersonalInfo::default()
        });
        assert!(fixed.validate().is_empty());
    }

    #[test]
    fn test_contact_patterns() {
        assert!(EMAIL_REGEX.is_match("jane.doe@example.com"));
        assert!(!EMAIL_REGEX.is_match("jane@localhost"));
        assert!(!EMAIL_REGEX.is_match("jane doe@example.com"));
        assert!(PHONE_REGEX.is_match("+44 (20) 7946-0958"));
        assert!(!PHONE_REGEX.is_match("555-CALL"));

        let form = FormState::default().with_personal(PersonalInfo {
            name: "Jane Doe".to_string(),
            email: "jane@localhost".to_string(),
            ..PersonalInfo::default()
        });
        assert_eq!(form.validate(), form.validate());
        assert_eq!(form.validate().len(), 1);
    }
}
