//! Route catalog and search.
//!
//! Answers "which routes go from A to B with this mode?" from the
//! persisted catalog, falling back to synthesized candidates built from
//! the fare formulas when the catalog has nothing for the pair.

mod config;
mod resolver;
mod store;
mod synth;

pub use config::ResolverConfig;
pub use resolver::{RouteCatalogResolver, SearchOutcome, SearchRequest};
pub use store::{Catalog, InMemoryRouteStore, RouteStore};
pub use synth::{Synthesizer, fallback_operator, is_intra_city};

#[cfg(test)]
pub(crate) use store::fixtures;
