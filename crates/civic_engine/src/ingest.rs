use civic_core::{
    BodyBase, Clock, Doctype, DocumentStore, Event, EventBase, File, MinutesItemBase,
    SchemaValidationError, StoreError,
};
use civic_logging::civic_info;
use serde_json::Value;
use thiserror::Error;

use crate::IntermediateEventRecord;

/// Store entity type under which raw event records are kept.
pub const EVENT_RECORD_ENTITY: &str = "event_record";
/// Store entity type for hydrated events.
pub const EVENT_ENTITY: &str = "event";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub upserted: usize,
    /// Records whose key no longer matches their fields; not stored.
    pub stale_keys: usize,
}

/// Upsert each record under its content key. Re-running over the same
/// records rewrites the same keys.
pub fn ingest_records(
    store: &dyn DocumentStore,
    records: &[IntermediateEventRecord],
) -> Result<IngestSummary, StoreError> {
    let mut summary = IngestSummary::default();
    for record in records {
        if !record.key_is_current() {
            summary.stale_keys += 1;
            continue;
        }
        store.upsert(EVENT_RECORD_ENTITY, &record.key, &record.to_mapping())?;
        summary.upserted += 1;
    }
    civic_info!(
        "Ingested {} event records ({} stale)",
        summary.upserted,
        summary.stale_keys
    );
    Ok(summary)
}

/// Event fields the listing page does not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationOptions {
    pub agenda_uri: String,
    pub caption_uri: String,
    pub legistar_event_id: Option<String>,
    pub legistar_event_link: Option<String>,
}

#[derive(Debug, Error)]
pub enum HydrateError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
}

/// Build an [`Event`] from a parsed record.
///
/// The body and each agenda item become projections; ids are attached when
/// the store already knows an entity by that name. Both timestamps are the
/// clock's now, and the record's content key becomes `external_source_id`.
pub fn hydrate_event(
    record: &IntermediateEventRecord,
    store: &dyn DocumentStore,
    options: &HydrationOptions,
    clock: &dyn Clock,
) -> Result<Event, HydrateError> {
    let body = match store.find_by_name("body", &record.body)? {
        Some(id) => BodyBase::with_id(&record.body, id),
        None => BodyBase::new(&record.body),
    };
    let minutes_items = record
        .agenda
        .iter()
        .map(|item| {
            Ok(match store.find_by_name("minutes_item", item)? {
                Some(id) => MinutesItemBase::with_id(item, id),
                None => MinutesItemBase::new(item),
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let now = clock.now().fixed_offset();
    let event = Event {
        base: EventBase {
            event_datetime: record.parsed_datetime.fixed_offset(),
            id: None,
        },
        body,
        thumbnail_static_file: File::new(&record.thumbnail_url),
        thumbnail_hover_file: File::new(&record.thumbnail_url),
        video_uri: Some(record.video_url.clone()),
        keywords: Vec::new(),
        matters: Vec::new(),
        minutes_items,
        people: Vec::new(),
        source_uri: record.source_url.clone(),
        agenda_uri: options.agenda_uri.clone(),
        caption_uri: options.caption_uri.clone(),
        minutes_uri: None,
        agenda_file_uri: None,
        minutes_file_uri: None,
        updated: now,
        created: now,
        external_source_id: Some(Value::String(record.key.clone())),
        legistar_event_id: options.legistar_event_id.clone(),
        legistar_event_link: options.legistar_event_link.clone(),
    };
    event.validate()?;
    Ok(event)
}

/// Hydrate and store an event under the record's content key.
pub fn store_event(
    record: &IntermediateEventRecord,
    store: &dyn DocumentStore,
    options: &HydrationOptions,
    clock: &dyn Clock,
) -> Result<Event, HydrateError> {
    let event = hydrate_event(record, store, options, clock)?;
    store.upsert(EVENT_ENTITY, &record.key, &event.to_mapping()?)?;
    Ok(event)
}
