//! Reading and writing form files

use crate::error::{Result, ResumeBuilderError};
use crate::form::state::FormState;
use log::info;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq)]
pub enum FormFileType {
    Toml,
    Json,
    Unknown,
}

impl FormFileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "toml" => FormFileType::Toml,
            "json" => FormFileType::Json,
            _ => FormFileType::Unknown,
        }
    }

    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeBuilderError::InvalidInput(format!(
                    "File has no extension: {}",
                    path.display()
                ))
            })?;

        match Self::from_extension(extension) {
            FormFileType::Unknown => Err(ResumeBuilderError::UnsupportedFormat(format!(
                "Unsupported form file type for: {} (use .toml or .json)",
                path.display()
            ))),
            file_type => Ok(file_type),
        }
    }

    pub fn parse(&self, content: &str) -> Result<FormState> {
        match self {
            FormFileType::Toml => Ok(toml::from_str(content)?),
            FormFileType::Json => Ok(serde_json::from_str(content)?),
            FormFileType::Unknown => Err(ResumeBuilderError::UnsupportedFormat(
                "Cannot parse a form of unknown type".to_string(),
            )),
        }
    }

    pub fn serialize(&self, state: &FormState) -> Result<String> {
        match self {
            FormFileType::Toml => toml::to_string_pretty(state).map_err(|e| {
                ResumeBuilderError::InvalidInput(format!("Failed to serialize form: {}", e))
            }),
            FormFileType::Json => Ok(serde_json::to_string_pretty(state)?),
            FormFileType::Unknown => Err(ResumeBuilderError::UnsupportedFormat(
                "Cannot serialize a form of unknown type".to_string(),
            )),
        }
    }
}

pub async fn load_form(path: &Path) -> Result<FormState> {
    if !path.exists() {
        return Err(ResumeBuilderError::InvalidInput(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let file_type = FormFileType::detect(path)?;
    info!("Loading form from: {}", path.display());
    let content = fs::read_to_string(path).await?;
    file_type.parse(&content)
}

pub async fn save_form(state: &FormState, path: &Path) -> Result<()> {
    let file_type = FormFileType::detect(path)?;
    let content = file_type.serialize(state)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, content).await?;
    info!("Saved form to: {}", path.display());
    Ok(())
}
