//! Render-and-export driver shared by single renders and batch files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, info, warn};

use crate::config::{Configuration, Job};
use crate::content::ContentDescriptor;
use crate::encoder::MatrixEncoder;
use crate::error::RenderError;
use crate::export;
use crate::logo::{self, LogoOutcome};
use crate::studio::Studio;
use crate::style::StyleConfig;

/// What a batch run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    /// Jobs whose required field was empty.
    pub skipped: usize,
    pub failed: usize,
}

/// Renders one job and writes it in every configured format.
///
/// Incomplete content yields no files and no error. An encoder failure is
/// returned with the [`RenderError`] still reachable through `downcast_ref`.
pub async fn render_job<E: MatrixEncoder>(
    studio: &mut Studio<E>,
    cfg: &Configuration,
    name: &str,
    content: &ContentDescriptor,
    style: &StyleConfig,
    logo_path: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    match studio.generate(content, style) {
        Ok(generation) => debug!(%generation, name, "render ready"),
        Err(RenderError::Incomplete(kind)) => {
            debug!(%kind, name, "skipping incomplete content");
            return Ok(Vec::new());
        }
        Err(err) => return Err(anyhow!(err).context(format!("rendering {name}"))),
    }

    if let Some(path) = logo_path {
        stamp_logo(studio, path).await;
    }

    let surface = studio
        .current()
        .map(|render| render.surface())
        .context("render vanished before export")?;
    cfg.formats
        .iter()
        .map(|format| export::write(surface, &cfg.output_dir, name, *format))
        .collect()
}

async fn stamp_logo<E: MatrixEncoder>(studio: &mut Studio<E>, path: &Path) {
    let Some(ticket) = studio.request_logo() else {
        return;
    };
    match logo::decode_file(path, ticket.token()).await {
        Ok(image) => {
            if studio.apply_logo(&ticket, &image) == LogoOutcome::Stale {
                warn!(path = %path.display(), "logo arrived after the render was replaced");
            }
        }
        Err(err) => warn!(path = %path.display(), error = %err, "logo skipped"),
    }
}

/// Runs `jobs` in order through one session. A failing job is logged and
/// the rest still run; counters accumulate across all of them.
pub async fn run_jobs<E: MatrixEncoder>(
    studio: &mut Studio<E>,
    cfg: &Configuration,
    jobs: &[Job],
) -> BatchReport {
    info!(jobs = jobs.len(), "running batch");
    let mut report = BatchReport::default();
    for (i, job) in jobs.iter().enumerate() {
        let name = job
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_{}", cfg.file_name, i + 1));
        let style = job.style.as_ref().unwrap_or(&cfg.style);
        let logo = job.logo.as_deref().or(cfg.logo.as_deref());
        match render_job(studio, cfg, &name, &job.content, style, logo).await {
            Ok(paths) if paths.is_empty() => report.skipped += 1,
            Ok(paths) => report.written.extend(paths),
            Err(err) => {
                let alert = err
                    .downcast_ref::<RenderError>()
                    .and_then(|e| e.user_message(cfg.language))
                    .unwrap_or_default();
                let reason = format!("{err:#}");
                error!(job = i, error = %reason, alert, "job failed");
                report.failed += 1;
            }
        }
    }
    if report.failed > 0 {
        warn!(failed = report.failed, "batch finished with failures");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use tempfile::tempdir;

    fn config(dir: &Path) -> Configuration {
        Configuration {
            output_dir: dir.to_path_buf(),
            formats: vec![ExportFormat::Png, ExportFormat::Svg],
            ..Configuration::default()
        }
    }

    #[tokio::test]
    async fn writes_every_configured_format() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path());
        let mut studio = Studio::new(cfg.payload_context());
        let paths = render_job(
            &mut studio,
            &cfg,
            "Shop Front",
            &ContentDescriptor::phone("0901234567"),
            &cfg.style,
            None,
        )
        .await
        .unwrap();
        assert_eq!(
            paths,
            vec![
                tmp.path().join("shop_front.png"),
                tmp.path().join("shop_front.svg"),
            ]
        );
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[tokio::test]
    async fn incomplete_content_writes_nothing() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path());
        let mut studio = Studio::new(cfg.payload_context());
        let paths = render_job(
            &mut studio,
            &cfg,
            "empty",
            &ContentDescriptor::url(""),
            &cfg.style,
            None,
        )
        .await
        .unwrap();
        assert!(paths.is_empty());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
        assert_eq!(studio.stats().total(), 0);
    }

    #[tokio::test]
    async fn encoding_failure_keeps_the_render_error() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path());
        let mut studio = Studio::new(cfg.payload_context());
        let err = render_job(
            &mut studio,
            &cfg,
            "huge",
            &ContentDescriptor::url("x".repeat(4000)),
            &cfg.style,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::Encoding(_))
        ));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
