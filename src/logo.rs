use std::io::Cursor;
use std::path::Path;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::LogoError;
use crate::studio::Generation;

/// Ties an in-flight logo decode to the render it was requested for.
#[derive(Debug, Clone)]
pub struct LogoTicket {
    generation: Generation,
    cancel: CancellationToken,
}

impl LogoTicket {
    pub(crate) fn new(generation: Generation, cancel: CancellationToken) -> Self {
        Self { generation, cancel }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// What happened to a decoded logo handed back to the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoOutcome {
    Applied,
    /// The render it was meant for has been replaced or reset.
    Stale,
}

// Sniffs the format from the bytes; the upload's file name is not trusted.
pub fn decode_rgba8(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    let img = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(img.to_rgba8())
}

/// Decodes on the blocking pool. Resolves to [`LogoError::Cancelled`] as
/// soon as `cancel` fires.
pub async fn decode(bytes: Vec<u8>, cancel: CancellationToken) -> Result<RgbaImage, LogoError> {
    let task = tokio::task::spawn_blocking(move || decode_rgba8(&bytes));
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("logo decode cancelled");
            Err(LogoError::Cancelled)
        }
        res = task => Ok(res??),
    }
}

pub async fn decode_file(path: &Path, cancel: CancellationToken) -> Result<RgbaImage, LogoError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LogoError::Decode(image::ImageError::IoError(e)))?;
    decode(bytes, cancel).await
}
