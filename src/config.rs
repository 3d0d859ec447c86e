use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::content::ContentDescriptor;
use crate::export::{DEFAULT_FILE_NAME, ExportFormat};
use crate::language::Language;
use crate::payload::PayloadContext;
use crate::style::StyleConfig;

/// Session settings. Every field has a default matching a freshly opened
/// generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    pub language: Language,
    /// Origin the map landing page is served from.
    pub origin: String,
    pub output_dir: PathBuf,
    pub file_name: String,
    pub formats: Vec<ExportFormat>,
    pub style: StyleConfig,
    pub logo: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            language: Language::default(),
            origin: "http://localhost:5173".to_string(),
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            formats: vec![ExportFormat::Png],
            style: StyleConfig::default(),
            logo: None,
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.origin.starts_with("http://") || self.origin.starts_with("https://"),
            "origin must start with http:// or https://, got `{}`",
            self.origin
        );
        ensure!(!self.formats.is_empty(), "formats must not be empty");
        self.style.validate().context("invalid style")?;
        Ok(self)
    }

    pub fn payload_context(&self) -> PayloadContext {
        PayloadContext::new(self.language, self.origin.clone())
    }
}

/// A list of renders sharing one session (and so one set of counters).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BatchFile {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Job {
    /// Output file name; the session `file-name` plus job index when absent.
    #[serde(default)]
    pub name: Option<String>,
    pub content: ContentDescriptor,
    /// Replaces the session style for this job.
    #[serde(default)]
    pub style: Option<StyleConfig>,
    #[serde(default)]
    pub logo: Option<PathBuf>,
}

impl BatchFile {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch file {}", path.display()))?;
        let batch: BatchFile = serde_yaml::from_str(&s)
            .with_context(|| format!("failed to parse batch file {}", path.display()))?;
        for (i, job) in batch.jobs.iter().enumerate() {
            if let Some(style) = &job.style {
                style
                    .validate()
                    .with_context(|| format!("invalid style for job {i}"))?;
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BorderKind;

    #[test]
    fn defaults_match_a_fresh_page() {
        let cfg: Configuration = serde_yaml::from_str("{}").expect("parse config");
        assert_eq!(cfg.language, Language::Vi);
        assert_eq!(cfg.file_name, "qrcode");
        assert_eq!(cfg.formats, vec![ExportFormat::Png]);
        assert_eq!(cfg.style.logo_size, 20);
        assert_eq!(cfg.style.border, BorderKind::Solid);
        assert_eq!(cfg.style.border_color.to_string(), "#3B82F6");
        assert!(cfg.validated().is_ok());
    }

    #[test]
    fn rejects_bad_origin_and_logo_size() {
        let cfg: Configuration = serde_yaml::from_str("origin: qr.example.com").unwrap();
        assert!(cfg.validated().is_err());

        let cfg: Configuration = serde_yaml::from_str("style:\n  logo-size: 45\n").unwrap();
        assert!(cfg.validated().is_err());
    }
}
