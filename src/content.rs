//! Typed description of what a QR code should carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Url,
    Phone,
    Maps,
    #[serde(alias = "vcard")]
    Contact,
    Wifi,
}

impl ContentKind {
    pub const ALL: [Self; 5] = [Self::Url, Self::Phone, Self::Maps, Self::Contact, Self::Wifi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Phone => "phone",
            Self::Maps => "maps",
            Self::Contact => "contact",
            Self::Wifi => "wifi",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the five supported payload forms. Exactly one is active per
/// render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentDescriptor {
    Url { value: String },
    Phone { value: String },
    Maps(MapsLocation),
    #[serde(alias = "vcard")]
    Contact(ContactCard),
    Wifi(WifiCredentials),
}

impl ContentDescriptor {
    pub fn url(value: impl Into<String>) -> Self {
        Self::Url {
            value: value.into(),
        }
    }

    pub fn phone(value: impl Into<String>) -> Self {
        Self::Phone {
            value: value.into(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Url { .. } => ContentKind::Url,
            Self::Phone { .. } => ContentKind::Phone,
            Self::Maps(_) => ContentKind::Maps,
            Self::Contact(_) => ContentKind::Contact,
            Self::Wifi(_) => ContentKind::Wifi,
        }
    }

    /// Whether the field a payload cannot be built without is non-empty.
    pub fn has_required_field(&self) -> bool {
        match self {
            Self::Url { value } | Self::Phone { value } => !value.is_empty(),
            Self::Maps(maps) => !maps.url.is_empty(),
            Self::Contact(card) => !card.name.is_empty(),
            Self::Wifi(wifi) => !wifi.ssid.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MapsLocation {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ContactCard {
    pub name: String,
    pub job_title: String,
    pub phone: String,
    pub email: String,
    pub organization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WifiCredentials {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub encryption: WifiEncryption,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WifiEncryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    /// Open network; the password field is still emitted as given.
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        }
    }
}

impl fmt::Display for WifiEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WifiEncryption {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" => Ok(Self::Wpa),
            "wep" => Ok(Self::Wep),
            "nopass" => Ok(Self::NoPass),
            _ => Err(UnknownVariant {
                kind: "wifi encryption",
                value: s.to_string(),
                expected: "WPA, WEP, nopass",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_descriptors() {
        let yaml = r#"
type: wifi
ssid: Office
password: hunter2
encryption: WEP
"#;
        let content: ContentDescriptor = serde_yaml::from_str(yaml).expect("parse wifi");
        assert_eq!(content.kind(), ContentKind::Wifi);
        match content {
            ContentDescriptor::Wifi(wifi) => {
                assert_eq!(wifi.ssid, "Office");
                assert_eq!(wifi.encryption, WifiEncryption::Wep);
            }
            other => panic!("expected wifi, got {other:?}"),
        }
    }

    #[test]
    fn accepts_vcard_alias() {
        let content: ContentDescriptor =
            serde_yaml::from_str("type: vcard\nname: An\n").expect("parse vcard");
        assert_eq!(content.kind(), ContentKind::Contact);
    }

    #[test]
    fn required_fields() {
        assert!(!ContentDescriptor::url("").has_required_field());
        assert!(ContentDescriptor::phone("0901234567").has_required_field());
        let card = ContactCard {
            email: "a@b.c".into(),
            ..Default::default()
        };
        assert!(!ContentDescriptor::Contact(card).has_required_field());
    }
}
