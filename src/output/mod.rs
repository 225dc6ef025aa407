//! Document output: layout, PDF rendering and saving

pub mod layout;
pub mod metrics;
pub mod renderer;

use crate::error::Result;
use std::path::Path;

pub use renderer::{PdfRenderer, PDF_MIME_TYPE};

pub const DEFAULT_FILE_NAME: &str = "resume.pdf";

pub fn save_document(bytes: &[u8], file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, bytes)?;
    Ok(())
}

/// Output path for `base_name`, keeping its directory and adding an optional timestamp to the stem
pub fn suggest_filename(base_name: &str, timestamp: bool) -> String {
    let base = Path::new(base_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let file_name = format!("{}{}.pdf", stem, timestamp_suffix);
    match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && base.file_stem().is_some() => {
            parent.join(file_name).to_string_lossy().to_string()
        }
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(DEFAULT_FILE_NAME, false), "resume.pdf");
        assert_eq!(suggest_filename("", false), "resume.pdf");
        assert_eq!(suggest_filename("jane_doe.pdf", false), "jane_doe.pdf");

        let stamped = suggest_filename("resume.pdf", true);
        assert!(stamped.starts_with("resume_"));
        assert!(stamped.ends_with(".pdf"));
        assert_eq!(stamped.len(), "resume_YYYYMMDD_HHMMSS.pdf".len());
    }

    #[test]
    fn test_suggest_filename_keeps_directory() {
        let expected = Path::new("build").join("out").join("cv.pdf");
        assert_eq!(
            suggest_filename("build/out/cv.pdf", false),
            expected.to_string_lossy()
        );

        let stamped = PathBuf::from(suggest_filename("build/out/cv.pdf", true));
        assert_eq!(stamped.parent(), Some(Path::new("build/out")));
        let name = stamped.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("cv_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_save_document_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("resume.pdf");
        save_document(b"%PDF-1.3", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
    }
}
