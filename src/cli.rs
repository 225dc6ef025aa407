//! CLI interface for the resume builder

use crate::form::state::{ExperienceLevel, FormSection, DEFAULT_SKILL_SCORE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-builder")]
#[command(about = "Build a resume PDF from a form file, optionally enriched by an AI writing assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the resume PDF from a form file
    Generate {
        /// Path to the form file (TOML or JSON)
        #[arg(short, long)]
        form: PathBuf,

        /// Where to write the PDF (defaults to the configured file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the form text as written, without calling the text generation service
        #[arg(long)]
        no_enrich: bool,

        /// Keep the original text of a field when its enrichment call fails
        #[arg(long)]
        fallback_to_raw: bool,

        /// Append a timestamp to the output file name
        #[arg(long)]
        timestamp: bool,
    },

    /// Create and edit form files
    Form {
        #[command(subcommand)]
        action: FormAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum FormAction {
    /// Write a starter form file
    Init {
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print a form file's contents and warnings
    Show { file: PathBuf },

    /// Set personal details, the job profile or the experience level
    Set {
        file: PathBuf,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        job_title: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        summary: Option<String>,

        /// Target job description used as enrichment context
        #[arg(long)]
        job_profile: Option<String>,

        /// fresher or experienced
        #[arg(long, value_parser = parse_experience_level)]
        level: Option<ExperienceLevel>,
    },

    /// Append a skill
    AddSkill {
        file: PathBuf,

        #[arg(long)]
        name: String,

        /// Rating from 1 to 10
        #[arg(long, default_value_t = DEFAULT_SKILL_SCORE)]
        score: u8,
    },

    /// Replace the skill at INDEX (0-based)
    EditSkill {
        file: PathBuf,
        index: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        score: Option<u8>,
    },

    /// Append an education entry
    AddEducation {
        file: PathBuf,
        #[command(flatten)]
        fields: EducationFields,
    },

    /// Update the education entry at INDEX (0-based)
    EditEducation {
        file: PathBuf,
        index: usize,
        #[command(flatten)]
        fields: EducationFields,
    },

    /// Append a work experience entry
    AddExperience {
        file: PathBuf,
        #[command(flatten)]
        fields: WorkFields,
    },

    /// Update the work experience entry at INDEX (0-based)
    EditExperience {
        file: PathBuf,
        index: usize,
        #[command(flatten)]
        fields: WorkFields,
    },

    /// Append a project
    AddProject {
        file: PathBuf,
        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Update the project at INDEX (0-based)
    EditProject {
        file: PathBuf,
        index: usize,
        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Append a hobby or interest
    AddHobby { file: PathBuf, hobby: String },

    /// Remove the entry at INDEX (0-based) from a section
    Remove {
        file: PathBuf,

        /// skills, education, experience, projects or hobbies
        #[arg(value_parser = parse_section)]
        section: FormSection,

        index: usize,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct EducationFields {
    #[arg(long)]
    pub degree: Option<String>,

    #[arg(long)]
    pub institution: Option<String>,

    /// Year of graduation
    #[arg(long)]
    pub year: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WorkFields {
    #[arg(long)]
    pub job_title: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    /// e.g. "Jan 2020 - Dec 2022"
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub technologies: Option<String>,

    #[arg(long)]
    pub link: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

pub fn parse_section(section: &str) -> Result<FormSection, String> {
    section.parse()
}

pub fn parse_experience_level(level: &str) -> Result<ExperienceLevel, String> {
    level.parse()
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "resume-builder",
            "generate",
            "--form",
            "me.toml",
            "--no-enrich",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                form,
                output,
                no_enrich,
                fallback_to_raw,
                ..
            } => {
                assert_eq!(form, PathBuf::from("me.toml"));
                assert!(output.is_none());
                assert!(no_enrich);
                assert!(!fallback_to_raw);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::parse_from(["resume-builder", "form", "remove", "me.toml", "hobbies", "2"]);
        match cli.command {
            Commands::Form {
                action: FormAction::Remove { section, index, .. },
            } => {
                assert_eq!(section, FormSection::Hobbies);
                assert_eq!(index, 2);
            }
            _ => panic!("expected form remove"),
        }
        assert!(
            Cli::try_parse_from(["resume-builder", "form", "remove", "me.toml", "awards", "0"])
                .is_err()
        );
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(&PathBuf::from("resume.pdf"), &["pdf"]).is_ok());
        assert!(validate_file_extension(&PathBuf::from("resume.PDF"), &["pdf"]).is_ok());
        assert!(validate_file_extension(&PathBuf::from("resume.docx"), &["pdf"]).is_err());
        assert!(validate_file_extension(&PathBuf::from("resume"), &["pdf"]).is_err());
    }
}
