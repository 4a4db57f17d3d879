//! Orchestration of movie search ingestion and record enrichment.
//!
//! Composes the OMDb client/resolver layer with the catalog store: bulk
//! ingestion of search results as partial records, and on-demand promotion
//! of a partial record to a full one. Upstream failures never propagate
//! past this crate; only store errors do.

pub mod cache;
pub mod enrich;
pub mod ingest;
pub mod store;

pub use cache::{evaluate_guard, GuardDecision, GuardPolicy};
pub use enrich::{fill_movie_details, EnrichOutcome};
pub use ingest::{search_and_save, SearchOutcome};
pub use store::{CatalogStore, MovieRecord, PgCatalog, SearchTermRecord};
