use std::fmt::Write;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// The record fields a content key is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFields<'a> {
    pub agenda: &'a [String],
    pub body: &'a str,
    pub event_datetime: NaiveDate,
    pub source_url: &'a str,
    pub thumbnail_url: &'a str,
    pub video_url: &'a str,
}

/// Deterministic 64-hex-char SHA-256 over the record fields.
///
/// Every value is written as `name:len:bytes` so no two distinct records can
/// serialize to the same byte stream. Agenda order is significant.
pub fn content_key(fields: &KeyFields<'_>) -> String {
    let mut hasher = Sha256::new();
    let date = fields.event_datetime.format("%Y-%m-%d").to_string();

    update_field(&mut hasher, "agenda", &fields.agenda.len().to_string());
    for item in fields.agenda {
        update_field(&mut hasher, "agenda_item", item);
    }
    update_field(&mut hasher, "body", fields.body);
    update_field(&mut hasher, "event_datetime", &date);
    update_field(&mut hasher, "source_url", fields.source_url);
    update_field(&mut hasher, "thumbnail_url", fields.thumbnail_url);
    update_field(&mut hasher, "video_url", fields.video_url);

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

fn update_field(hasher: &mut Sha256, name: &str, value: &str) {
    hasher.update(name.as_bytes());
    hasher.update(b":");
    hasher.update(value.len().to_string().as_bytes());
    hasher.update(b":");
    hasher.update(value.as_bytes());
}
