use thiserror::Error;

use crate::content::ContentKind;
use crate::language::Language;

/// Failure of a single render request.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The active content type is missing its required field.
    #[error("{0} content is missing its required field")]
    Incomplete(ContentKind),

    /// The encoder could not turn the payload into a matrix.
    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

impl RenderError {
    /// Text shown to the user for this failure, if any. Incomplete input is
    /// a silent no-op and has no message.
    pub fn user_message(&self, language: Language) -> Option<&'static str> {
        match self {
            Self::Incomplete(_) => None,
            Self::Encoding(_) => Some(language.encoding_failure()),
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    /// Payload exceeds the capacity of the largest symbol at the requested
    /// correction level.
    #[error("payload does not fit in a QR code: {0}")]
    Capacity(#[from] qrcode::types::QrError),

    #[error("requested bitmap width must be greater than zero")]
    EmptyCanvas,
}

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("failed to decode logo: {0}")]
    Decode(#[from] image::ImageError),

    #[error("logo decode cancelled")]
    Cancelled,

    #[error("logo decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A string did not name any variant of a closed set.
#[derive(Debug, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
