//! Civic engine: listing-row scraping, normalization and ingestion.
mod config;
mod dates;
mod fetch;
mod ingest;
mod invocation;
mod key;
mod listing;
mod parse;
mod route;
mod text;
mod types;

pub use config::{SiteConfig, SiteRules};
pub use fetch::{PageFetcher, StaticFetcher};
pub use ingest::{
    hydrate_event, ingest_records, store_event, HydrateError, HydrationOptions, IngestSummary,
    EVENT_ENTITY, EVENT_RECORD_ENTITY,
};
pub use key::{content_key, KeyFields};
pub use listing::{split_listing, FragmentFailure, ListingProcessor, PageReport};
pub use parse::EventRecordParser;
pub use route::resolve_route;
pub use text::{clean, split_agenda};
pub use types::{
    ConfigError, FetchError, IntermediateEventRecord, MalformedUriError, UnparsableFragmentError,
};
