//! Tag hierarchy and UDT inheritance resolution
//!
//! Pipeline for one provider:
//!
//! ```text
//! rows -> loader -> group -> definitions -> resolve (+ hierarchy) -> assemble (+ stats)
//! ```
//!
//! [`provider`] drives it, per provider or over a whole backup.

pub mod assemble;
pub mod config;
pub mod definitions;
pub mod group;
pub mod hierarchy;
pub mod loader;
pub mod node;
pub mod provider;
pub mod resolve;
pub mod stats;

pub use config::{ScriptConfig, TagConfig, TagType};
pub use loader::TagRow;
pub use node::Node;
pub use provider::{
    resolve_all, resolve_named, resolve_provider, ResolvedBackup, ResolvedProvider,
    TagProviderRecord,
};
pub use stats::ProviderStatistics;
