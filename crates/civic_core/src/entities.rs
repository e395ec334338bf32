use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doctype::{check_fields, Doctype, Field, Shape};
use crate::SchemaValidationError;

/// One `{key: value}` entry of an event's keyword list.
pub type Keyword = BTreeMap<String, String>;

/// A lightweight `{name, id}` reference to a canonical entity held by the store.
pub trait Projection {
    /// Store entity type the `id` resolves against.
    fn collection(&self) -> &'static str;
    fn name(&self) -> &str;
    fn id(&self) -> Option<&str>;
}

const PROJECTION_FIELDS: &[Field] = &[
    Field::required("name", Shape::String),
    Field::optional("id", Shape::String),
];

macro_rules! projection {
    ($(#[$meta:meta])* $name:ident, $collection:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub name: String,
            pub id: Option<String>,
        }

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    id: None,
                }
            }

            pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    id: Some(id.into()),
                }
            }
        }

        impl Doctype for $name {
            const ENTITY: &'static str = stringify!($name);
            const FIELDS: &'static [Field] = PROJECTION_FIELDS;
        }

        impl Projection for $name {
            fn collection(&self) -> &'static str {
                $collection
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

projection!(
    /// Abbreviated body (council, committee) embedded in events.
    BodyBase,
    "body"
);
projection!(
    /// Abbreviated person embedded in events.
    PersonBase,
    "person"
);
projection!(
    /// Abbreviated legislative matter embedded in events.
    MatterBase,
    "matter"
);
projection!(
    /// Abbreviated minutes item embedded in events.
    MinutesItemBase,
    "minutes_item"
);

/// A stored file, identified by its URI alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub uri: String,
    pub name: Option<String>,
}

impl File {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
        }
    }

    pub fn named(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: Some(name.into()),
        }
    }
}

impl Doctype for File {
    const ENTITY: &'static str = "File";
    const FIELDS: &'static [Field] = &[
        Field::required("uri", Shape::AbsoluteUri),
        Field::optional("name", Shape::String),
    ];
}

/// Abbreviated event: the occurrence instant plus an optional store id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBase {
    pub event_datetime: DateTime<FixedOffset>,
    pub id: Option<String>,
}

impl Doctype for EventBase {
    const ENTITY: &'static str = "EventBase";
    const FIELDS: &'static [Field] = &[
        Field::required("event_datetime", Shape::Timestamp),
        Field::optional("id", Shape::String),
    ];
}

/// A single ingested meeting occurrence.
///
/// Events are values: a newer scrape of the same meeting is a new `Event`
/// with a later `updated`, never an in-place edit. Related entities are held
/// as projections and resolved through the store by id.
///
/// `external_source_id` is opaque; a `Some(Value::Null)` does not survive a
/// mapping round-trip and should be written as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub base: EventBase,
    pub body: BodyBase,
    pub thumbnail_static_file: File,
    pub thumbnail_hover_file: File,
    pub video_uri: Option<String>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub matters: Vec<MatterBase>,
    #[serde(default)]
    pub minutes_items: Vec<MinutesItemBase>,
    #[serde(default)]
    pub people: Vec<PersonBase>,
    pub source_uri: String,
    pub agenda_uri: String,
    pub caption_uri: String,
    pub minutes_uri: Option<String>,
    pub agenda_file_uri: Option<String>,
    pub minutes_file_uri: Option<String>,
    pub updated: DateTime<FixedOffset>,
    pub created: DateTime<FixedOffset>,
    pub external_source_id: Option<Value>,
    pub legistar_event_id: Option<String>,
    pub legistar_event_link: Option<String>,
}

impl Event {
    pub fn event_datetime(&self) -> DateTime<FixedOffset> {
        self.base.event_datetime
    }

    /// Every id-bearing projection embedded in this event, body first.
    pub fn references(&self) -> Vec<&dyn Projection> {
        let mut refs: Vec<&dyn Projection> = vec![&self.body];
        refs.extend(self.matters.iter().map(|m| m as &dyn Projection));
        refs.extend(self.minutes_items.iter().map(|m| m as &dyn Projection));
        refs.extend(self.people.iter().map(|p| p as &dyn Projection));
        refs
    }
}

impl Doctype for Event {
    const ENTITY: &'static str = "Event";
    const FIELDS: &'static [Field] = &[
        Field::required("event_datetime", Shape::Timestamp),
        Field::optional("id", Shape::String),
        Field::required("body", Shape::Mapping(check_fields::<BodyBase>)),
        Field::required("thumbnail_static_file", Shape::Mapping(check_fields::<File>)),
        Field::required("thumbnail_hover_file", Shape::Mapping(check_fields::<File>)),
        Field::optional("video_uri", Shape::String),
        Field::optional("keywords", Shape::StringPairs),
        Field::optional("matters", Shape::Sequence(check_fields::<MatterBase>)),
        Field::optional("minutes_items", Shape::Sequence(check_fields::<MinutesItemBase>)),
        Field::optional("people", Shape::Sequence(check_fields::<PersonBase>)),
        Field::required("source_uri", Shape::String),
        Field::required("agenda_uri", Shape::String),
        Field::required("caption_uri", Shape::String),
        Field::optional("minutes_uri", Shape::String),
        Field::optional("agenda_file_uri", Shape::String),
        Field::optional("minutes_file_uri", Shape::String),
        Field::required("updated", Shape::Timestamp),
        Field::required("created", Shape::Timestamp),
        Field::optional("external_source_id", Shape::Any),
        Field::optional("legistar_event_id", Shape::String),
        Field::optional("legistar_event_link", Shape::String),
    ];

    fn validate(&self) -> Result<(), SchemaValidationError> {
        if self.created > self.updated {
            return Err(SchemaValidationError::Invariant {
                entity: Self::ENTITY,
                message: format!(
                    "created ({}) is later than updated ({})",
                    self.created.to_rfc3339(),
                    self.updated.to_rfc3339()
                ),
            });
        }
        Ok(())
    }
}
