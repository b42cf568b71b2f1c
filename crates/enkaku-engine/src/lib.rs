//! In-memory municipal-lineage engine.
//!
//! Consumes the record collections produced by a
//! [`RecordSource`](enkaku_core::source::RecordSource), aggregates version
//! records into persistent municipality identities, and answers lineage
//! queries over the change-event graph: what created a unit, what ended it,
//! and the full chain of mergers, splits, renames and status enactments
//! connecting it to earlier and later units.
//!
//! All queries run over an immutable [`Snapshot`] built once per load;
//! they are pure, reentrant, and safe to call from any number of readers.

mod adjacency;
mod aggregate;
mod alias;
mod ancestry;
mod index;
mod search;

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{Error, Result};
pub use snapshot::{ResolverOptions, Snapshot};
pub use store::DataStore;
