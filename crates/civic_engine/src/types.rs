use std::fmt;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use civic_core::Mapping;
use serde_json::json;
use thiserror::Error;

use crate::key::{content_key, KeyFields};

/// Flat record produced for one listing row.
///
/// `parsed_datetime` keeps the full civic-local instant for scheduling and
/// hydration; it is not part of the emitted mapping or the content key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateEventRecord {
    pub agenda: Vec<String>,
    pub body: String,
    pub event_datetime: NaiveDate,
    pub key: String,
    pub source_url: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub parsed_datetime: DateTime<Tz>,
}

impl IntermediateEventRecord {
    pub fn key_fields(&self) -> KeyFields<'_> {
        KeyFields {
            agenda: &self.agenda,
            body: &self.body,
            event_datetime: self.event_datetime,
            source_url: &self.source_url,
            thumbnail_url: &self.thumbnail_url,
            video_url: &self.video_url,
        }
    }

    /// True when `key` still matches the other fields.
    pub fn key_is_current(&self) -> bool {
        content_key(&self.key_fields()) == self.key
    }

    /// Flat mapping of the emitted fields; `event_datetime` as `YYYY-MM-DD`.
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        mapping.insert("agenda".into(), json!(self.agenda));
        mapping.insert("body".into(), json!(self.body));
        mapping.insert(
            "event_datetime".into(),
            json!(self.event_datetime.format("%Y-%m-%d").to_string()),
        );
        mapping.insert("key".into(), json!(self.key));
        mapping.insert("source_url".into(), json!(self.source_url));
        mapping.insert("thumbnail_url".into(), json!(self.thumbnail_url));
        mapping.insert("video_url".into(), json!(self.video_url));
        mapping
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve route `{route}` against `{sibling}`: no usable scheme")]
pub struct MalformedUriError {
    pub sibling: String,
    pub route: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnparsableFragmentError {
    #[error("row fragment has no {0}")]
    MissingElement(&'static str),
    #[error("unrecognized event date `{0}`")]
    InvalidDate(String),
    #[error(transparent)]
    Route(#[from] MalformedUriError),
}

/// Failure reported by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub status: Option<u16>,
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn new(status: Option<u16>, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "fetch {} failed with status {code}: {}", self.url, self.message),
            None => write!(f, "fetch {} failed: {}", self.url, self.message),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {name} selector `{selector}`: {message}")]
    InvalidSelector {
        name: &'static str,
        selector: String,
        message: String,
    },
    #[error("unknown civic timezone `{0}`")]
    UnknownTimezone(String),
    #[error("{0} must not be empty")]
    EmptyToken(&'static str),
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("worker pool: {0}")]
    WorkerPool(String),
    #[error("config format: {0}")]
    Format(String),
}
