use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// UI language. Forwarded to the map landing page and used for user-facing
/// messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    #[default]
    Vi,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vi => "vi",
            Self::En => "en",
        }
    }

    /// Alert text for a render that failed in the encoder.
    pub fn encoding_failure(&self) -> &'static str {
        match self {
            Self::Vi => "Có lỗi khi tạo mã QR. Vui lòng thử lại!",
            Self::En => "Something went wrong while generating the QR code. Please try again!",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vi" => Ok(Self::Vi),
            "en" => Ok(Self::En),
            _ => Err(UnknownVariant {
                kind: "language",
                value: s.to_string(),
                expected: "vi, en",
            }),
        }
    }
}
