//! Builds the text that gets encoded into the QR matrix.

use url::form_urlencoded;

use crate::content::{ContactCard, ContentDescriptor, MapsLocation, WifiCredentials};
use crate::language::Language;

/// Path of the static page that reads the map query parameters.
pub const MAP_LANDING_PATH: &str = "/map-landing.html";

/// Ambient inputs that are not part of the content itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadContext {
    pub language: Language,
    /// Scheme and host the map landing page is served from.
    pub origin: String,
}

impl PayloadContext {
    pub fn new(language: Language, origin: impl Into<String>) -> Self {
        Self {
            language,
            origin: origin.into(),
        }
    }
}

/// Returns `None` when the active variant's required field is empty.
pub fn build(content: &ContentDescriptor, ctx: &PayloadContext) -> Option<String> {
    if !content.has_required_field() {
        return None;
    }
    let payload = match content {
        ContentDescriptor::Url { value } => url_payload(value),
        ContentDescriptor::Phone { value } => format!("tel:{value}"),
        ContentDescriptor::Maps(maps) => maps_payload(maps, ctx),
        ContentDescriptor::Contact(card) => vcard_payload(card),
        ContentDescriptor::Wifi(wifi) => wifi_payload(wifi),
    };
    Some(payload)
}

fn url_payload(value: &str) -> String {
    if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{value}")
    }
}

fn maps_payload(maps: &MapsLocation, ctx: &PayloadContext) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("url", &maps.url);
    query.append_pair("lang", ctx.language.as_str());
    if !maps.title.is_empty() {
        query.append_pair("title", &maps.title);
    }
    if !maps.note.is_empty() {
        query.append_pair("note", &maps.note);
    }
    let origin = ctx.origin.trim_end_matches('/');
    format!("{origin}{MAP_LANDING_PATH}?{}", query.finish())
}

// vCard 3.0; every field line is present even when its value is empty.
fn vcard_payload(card: &ContactCard) -> String {
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", card.name),
        format!("TITLE:{}", card.job_title),
        format!("TEL:{}", card.phone),
        format!("EMAIL:{}", card.email),
        format!("ORG:{}", card.organization),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}

fn wifi_payload(wifi: &WifiCredentials) -> String {
    format!(
        "WIFI:T:{};S:{};P:{};;",
        wifi.encryption, wifi.ssid, wifi.password
    )
}
