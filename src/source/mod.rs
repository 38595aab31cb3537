//! Row sources
//!
//! Where tag provider settings and tag configuration rows come from: a
//! gateway backup database, or rows held in memory.

mod memory;
mod sqlite;

pub use memory::MemorySource;
pub use sqlite::SqliteSource;

use crate::core::error::Result;
use crate::tags::{TagProviderRecord, TagRow};

/// Read access to providers and their tag rows.
///
/// Providers of one source are resolved concurrently, so implementations
/// must be shareable between threads.
pub trait RowSource: Sync {
    /// All tag providers, ordered by id
    fn providers(&self) -> Result<Vec<TagProviderRecord>>;

    /// Tag rows of one provider, ordered by row id
    fn tag_rows(&self, provider_id: i32) -> Result<Vec<TagRow>>;
}
