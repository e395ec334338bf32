//! Civic core: the event document graph, its mapping conversions and the
//! collaborator seams (store, clock) the ingest pipeline writes through.
mod clock;
mod doctype;
mod entities;
mod error;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use doctype::{
    check_fields, from_mapping, to_mapping, Doctype, Field, Mapping, Presence, Shape, TableCheck,
};
pub use entities::{
    BodyBase, Event, EventBase, File, Keyword, MatterBase, MinutesItemBase, PersonBase, Projection,
};
pub use error::SchemaValidationError;
pub use store::{verify_references, DocumentStore, InMemoryStore, ReferenceError, StoreError};
