//! Resume builder: fill in a resume form and render it as a PDF

use anyhow::{anyhow, Context};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_builder::cli::{
    self, Cli, Commands, ConfigAction, EducationFields, FormAction, ProjectFields, WorkFields,
};
use resume_builder::config::Config;
use resume_builder::form::state::{EducationEntry, FormState, ProjectEntry, WorkEntry};
use resume_builder::form::{load_form, save_form};
use resume_builder::output::{save_document, suggest_filename};
use resume_builder::processing::{EnrichmentPolicy, ResumeGenerator};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    mut config: Config,
    config_override: Option<PathBuf>,
) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            form,
            output,
            no_enrich,
            fallback_to_raw,
            timestamp,
        } => {
            let state = load(&form).await?;
            print_warnings(&state);

            if fallback_to_raw {
                config.enrichment.fallback_to_raw = true;
            }

            let output_path = match output {
                Some(path) => {
                    cli::validate_file_extension(&path, &["pdf"]).map_err(|e| anyhow!(e))?;
                    path
                }
                None => PathBuf::from(suggest_filename(&config.document.output_file, timestamp)),
            };

            let generator = ResumeGenerator::from_config(&config, !no_enrich)?
                .with_file_name(output_path.to_string_lossy());

            println!("{} {}", "📄 Form:".bold(), form.display());
            if generator.is_enriching() {
                let policy = EnrichmentPolicy::from_fallback(config.enrichment.fallback_to_raw);
                println!(
                    "{} {} ({} calls, {:?})",
                    "🤖 Enriching with".bold(),
                    config.enrichment.model,
                    generator.planned_calls(&state),
                    policy
                );
            } else {
                println!("{}", "⚠️  Enrichment disabled, using form text as written".yellow());
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Generating resume...");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let result = generator.generate(&state).await;
            spinner.finish_and_clear();

            let document = match result {
                Ok(document) => document,
                Err(e) if e.is_service_error() => {
                    println!(
                        "{}",
                        "❌ The writing assistant is unavailable, no document was produced.".red()
                    );
                    println!("💡 Retry later, pass --fallback-to-raw, or use --no-enrich");
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };

            let output_path = PathBuf::from(&document.file_name);
            save_document(&document.bytes, &output_path)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;

            println!(
                "{} {} ({} bytes, {})",
                "✅ Resume written to".green().bold(),
                output_path.display(),
                document.bytes.len(),
                document.mime_type
            );
        }

        Commands::Form { action } => run_form_action(action).await?,

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("{}\n", "⚙️  Current Configuration".bold());
                println!("Enrichment:");
                println!("  API Base URL: {}", config.enrichment.api_base_url);
                println!("  Model: {}", config.enrichment.model);
                println!("  API Key Variable: {}", config.enrichment.api_key_env);
                println!("  Max Tokens: {}", config.enrichment.max_tokens);
                println!("  Temperature: {:.2}", config.enrichment.temperature);
                println!("  Timeout: {}s", config.enrichment.timeout_secs);
                println!("  Fallback To Raw: {}", config.enrichment.fallback_to_raw);
                println!("\nDocument:");
                println!("  Output File: {}", config.document.output_file);
                println!("  Title: {}", config.document.title);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let path = config_override.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("{} {}", "✅ Configuration reset:".green(), path.display());
            }

            Some(ConfigAction::Path) => {
                let path = config_override.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

async fn run_form_action(action: FormAction) -> anyhow::Result<()> {
    match action {
        FormAction::Init { file, force } => {
            if file.exists() && !force {
                return Err(anyhow!(
                    "{} already exists (use --force to overwrite)",
                    file.display()
                ));
            }
            save_form(&FormState::template(), &file)
                .await
                .with_context(|| format!("Failed to create form {}", file.display()))?;
            println!("{} {}", "✅ Form created:".green(), file.display());
        }

        FormAction::Show { file } => {
            let state = load(&file).await?;
            print_form(&state);
            print_warnings(&state);
        }

        FormAction::Set {
            file,
            name,
            job_title,
            email,
            phone,
            summary,
            job_profile,
            level,
        } => {
            let state = load(&file).await?;
            let mut personal = state.personal.clone();
            merge(&mut personal.name, name);
            merge(&mut personal.job_title, job_title);
            merge(&mut personal.email, email);
            merge(&mut personal.phone, phone);
            merge(&mut personal.summary, summary);

            let mut updated = state.with_personal(personal);
            if let Some(profile) = job_profile {
                updated = updated.with_job_profile(profile);
            }
            if let Some(level) = level {
                updated = updated.with_experience_level(level);
            }
            store(&updated, &file).await?;
        }

        FormAction::AddSkill { file, name, score } => {
            let state = load(&file).await?;
            store(&state.add_skill(name, score)?, &file).await?;
        }

        FormAction::EditSkill {
            file,
            index,
            name,
            score,
        } => {
            let state = load(&file).await?;
            let current = state
                .skills
                .get(index)
                .ok_or_else(|| anyhow!("No skill at index {}", index))?;
            let name = name.unwrap_or_else(|| current.name.clone());
            let score = score.unwrap_or(current.score);
            store(&state.edit_skill(index, name, score)?, &file).await?;
        }

        FormAction::AddEducation { file, fields } => {
            let state = load(&file).await?;
            let entry = education_entry(EducationEntry::default(), fields);
            store(&state.add_education(entry), &file).await?;
        }

        FormAction::EditEducation {
            file,
            index,
            fields,
        } => {
            let state = load(&file).await?;
            let current = state
                .education
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow!("No education entry at index {}", index))?;
            let entry = education_entry(current, fields);
            store(&state.edit_education(index, entry)?, &file).await?;
        }

        FormAction::AddExperience { file, fields } => {
            let state = load(&file).await?;
            let entry = work_entry(WorkEntry::default(), fields);
            store(&state.add_work(entry), &file).await?;
        }

        FormAction::EditExperience {
            file,
            index,
            fields,
        } => {
            let state = load(&file).await?;
            let current = state
                .work_experience
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow!("No work experience entry at index {}", index))?;
            let entry = work_entry(current, fields);
            store(&state.edit_work(index, entry)?, &file).await?;
        }

        FormAction::AddProject { file, fields } => {
            let state = load(&file).await?;
            let entry = project_entry(ProjectEntry::default(), fields);
            store(&state.add_project(entry), &file).await?;
        }

        FormAction::EditProject {
            file,
            index,
            fields,
        } => {
            let state = load(&file).await?;
            let current = state
                .projects
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow!("No project at index {}", index))?;
            let entry = project_entry(current, fields);
            store(&state.edit_project(index, entry)?, &file).await?;
        }

        FormAction::AddHobby { file, hobby } => {
            let state = load(&file).await?;
            store(&state.add_hobby(hobby), &file).await?;
        }

        FormAction::Remove {
            file,
            section,
            index,
        } => {
            let state = load(&file).await?;
            let updated = state.remove(section, index)?;
            store(&updated, &file).await?;
            println!(
                "🗑️  Removed {} #{} ({} left)",
                section,
                index,
                updated.section_len(section)
            );
        }
    }

    Ok(())
}

async fn load(path: &Path) -> anyhow::Result<FormState> {
    load_form(path)
        .await
        .with_context(|| format!("Failed to load form {}", path.display()))
}

async fn store(state: &FormState, path: &Path) -> anyhow::Result<()> {
    save_form(state, path)
        .await
        .with_context(|| format!("Failed to save form {}", path.display()))?;
    info!("Updated {}", path.display());
    println!("{} {}", "✅ Saved".green(), path.display());
    Ok(())
}

fn merge(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn education_entry(mut entry: EducationEntry, fields: EducationFields) -> EducationEntry {
    merge(&mut entry.degree, fields.degree);
    merge(&mut entry.institution, fields.institution);
    merge(&mut entry.year, fields.year);
    entry
}

fn work_entry(mut entry: WorkEntry, fields: WorkFields) -> WorkEntry {
    merge(&mut entry.job_title, fields.job_title);
    merge(&mut entry.company, fields.company);
    merge(&mut entry.duration, fields.duration);
    merge(&mut entry.description, fields.description);
    entry
}

fn project_entry(mut entry: ProjectEntry, fields: ProjectFields) -> ProjectEntry {
    merge(&mut entry.name, fields.name);
    merge(&mut entry.description, fields.description);
    merge(&mut entry.technologies, fields.technologies);
    merge(&mut entry.link, fields.link);
    entry
}

fn print_form(state: &FormState) {
    let personal = &state.personal;
    println!("{}", "👤 Personal".bold());
    println!("  Name: {}", personal.name);
    println!("  Job Title: {}", personal.job_title);
    println!("  E-mail: {}", personal.email);
    println!("  Phone: {}", personal.phone);
    println!("  Summary: {}", truncate_text(&personal.summary, 120));
    println!("  Level: {:?}", state.experience_level);
    println!("  Job Profile: {}", truncate_text(&state.job_profile, 120));

    println!("\n{}", "🛠️  Skills".bold());
    for (i, skill) in state.skills.iter().enumerate() {
        println!("  [{}] {} ({}/10)", i, skill.name, skill.score);
    }

    println!("\n{}", "🎓 Education".bold());
    for (i, edu) in state.education.iter().enumerate() {
        println!("  [{}] {}, {} ({})", i, edu.degree, edu.institution, edu.year);
    }

    println!("\n{}", "💼 Work Experience".bold());
    for (i, work) in state.work_experience.iter().enumerate() {
        println!(
            "  [{}] {} at {} ({})",
            i, work.job_title, work.company, work.duration
        );
    }

    println!("\n{}", "🚀 Projects".bold());
    for (i, project) in state.projects.iter().enumerate() {
        println!("  [{}] {} [{}]", i, project.name, project.technologies);
    }

    println!("\n{}", "🎯 Hobbies".bold());
    for (i, hobby) in state.hobbies.iter().enumerate() {
        println!("  [{}] {}", i, hobby);
    }
}

fn print_warnings(state: &FormState) {
    for warning in state.validate() {
        println!("{} {}", "⚠️ ".yellow(), warning.yellow());
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    format!("{}...", &truncated[..cut])
}
