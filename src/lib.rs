pub mod batch;
pub mod compositor;
pub mod config;
pub mod content;
pub mod encoder;
pub mod error;
pub mod export;
pub mod language;
pub mod logo;
pub mod payload;
pub mod stats;
pub mod studio;
pub mod style;

pub use content::{ContentDescriptor, ContentKind};
pub use error::{EncodeError, LogoError, RenderError};
pub use studio::{Generation, RenderResult, Studio};
pub use style::StyleConfig;
