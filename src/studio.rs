//! One user session: drives payload building, encoding and compositing,
//! owns the current render and the usage counters.

use std::fmt;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::compositor;
use crate::content::{ContentDescriptor, ContentKind};
use crate::encoder::{EncodeRequest, MatrixEncoder, QrMatrixEncoder};
use crate::error::{LogoError, RenderError};
use crate::logo::{self, LogoOutcome, LogoTicket};
use crate::payload::{self, PayloadContext};
use crate::stats::UsageStats;
use crate::style::StyleConfig;

/// Identifies one successful render within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct RenderResult {
    surface: RgbaImage,
    generation: Generation,
    kind: ContentKind,
    payload: String,
    style: StyleConfig,
    bitmap_width: u32,
    logo_applied: bool,
}

impl RenderResult {
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn logo_applied(&self) -> bool {
        self.logo_applied
    }
}

pub struct Studio<E = QrMatrixEncoder> {
    encoder: E,
    context: PayloadContext,
    stats: UsageStats,
    current: Option<RenderResult>,
    last_generation: u64,
    pending_logo: Option<CancellationToken>,
}

impl Studio<QrMatrixEncoder> {
    pub fn new(context: PayloadContext) -> Self {
        Self::with_encoder(QrMatrixEncoder, context)
    }
}

impl<E: MatrixEncoder> Studio<E> {
    pub fn with_encoder(encoder: E, context: PayloadContext) -> Self {
        Self {
            encoder,
            context,
            stats: UsageStats::new(),
            current: None,
            last_generation: 0,
            pending_logo: None,
        }
    }

    pub fn context(&self) -> &PayloadContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PayloadContext {
        &mut self.context
    }

    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn current(&self) -> Option<&RenderResult> {
        self.current.as_ref()
    }

    /// Renders `content` with `style`, replacing the current render.
    ///
    /// Incomplete content leaves everything as it was. An encoder failure
    /// also leaves the previous render and the counters untouched.
    pub fn generate(
        &mut self,
        content: &ContentDescriptor,
        style: &StyleConfig,
    ) -> Result<Generation, RenderError> {
        let kind = content.kind();
        let Some(payload) = payload::build(content, &self.context) else {
            debug!(%kind, "required field empty, nothing to render");
            return Err(RenderError::Incomplete(kind));
        };

        let request = EncodeRequest::for_style(style);
        let bitmap = self.encoder.encode(&payload, &request).map_err(|err| {
            error!(%kind, error = %err, "failed to encode payload");
            RenderError::from(err)
        })?;

        self.cancel_pending_logo();
        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        let surface = compositor::compose(&bitmap, style);
        self.current = Some(RenderResult {
            surface,
            generation,
            kind,
            payload,
            style: style.clone(),
            bitmap_width: bitmap.width(),
            logo_applied: false,
        });
        self.stats.record_today(kind);
        info!(%kind, %generation, total = self.stats.total(), "rendered QR code");
        Ok(generation)
    }

    /// Starts tracking a logo for the current render. Any earlier ticket is
    /// cancelled.
    pub fn request_logo(&mut self) -> Option<LogoTicket> {
        let generation = self.current.as_ref()?.generation;
        self.cancel_pending_logo();
        let token = CancellationToken::new();
        self.pending_logo = Some(token.clone());
        Some(LogoTicket::new(generation, token))
    }

    /// Draws a decoded logo if `ticket` still belongs to the current render.
    pub fn apply_logo(&mut self, ticket: &LogoTicket, logo: &RgbaImage) -> LogoOutcome {
        let current = match self.current.as_mut() {
            Some(current) if current.generation == ticket.generation() && !ticket.is_cancelled() => {
                current
            }
            _ => {
                warn!(ticket = %ticket.generation(), "discarding logo for a replaced render");
                return LogoOutcome::Stale;
            }
        };
        compositor::stamp_logo(
            &mut current.surface,
            current.bitmap_width,
            logo,
            &current.style,
        );
        current.logo_applied = true;
        self.pending_logo = None;
        LogoOutcome::Applied
    }

    /// Decodes `bytes` and stamps the result onto the current render.
    pub async fn attach_logo(&mut self, bytes: Vec<u8>) -> Result<LogoOutcome, LogoError> {
        let Some(ticket) = self.request_logo() else {
            return Ok(LogoOutcome::Stale);
        };
        let decoded = logo::decode(bytes, ticket.token()).await?;
        Ok(self.apply_logo(&ticket, &decoded))
    }

    /// Discards the current render. Counters are kept.
    pub fn reset(&mut self) {
        self.cancel_pending_logo();
        self.current = None;
        debug!("render discarded");
    }

    fn cancel_pending_logo(&mut self) {
        if let Some(token) = self.pending_logo.take() {
            token.cancel();
        }
    }
}
