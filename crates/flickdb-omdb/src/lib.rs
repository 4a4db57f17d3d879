pub mod client;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod types;

pub use client::OmdbClient;
pub use error::OmdbError;
pub use normalize::{
    normalize_detail, normalize_query, normalize_search_item, CanonicalDetail,
    CanonicalSearchItem,
};
pub use resolver::{
    resolve_by_id, resolve_by_title, ByIdStrategy, ByTitleStrategy, FetchFailure, FetchOutcome,
    IdConvention, MetadataSource, StrategyCall, TitleConvention,
};
pub use types::{DetailFields, RawDetail, RawSearchItem, SearchFields, SearchPayload};
