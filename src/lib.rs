//! tagtree - tag hierarchy and UDT inheritance resolution
//!
//! Reads the tag configuration of a gateway backup, rebuilds each provider's
//! folder hierarchy and materializes UDT instances from their definitions.

pub mod cli;
pub mod core;
pub mod export;
pub mod output;
pub mod source;
pub mod tags;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use source::{MemorySource, RowSource, SqliteSource};
pub use tags::{Node, ProviderStatistics, ResolvedProvider, TagConfig, TagProviderRecord};
