//! JSON export of a resolved provider
//!
//! The export mirrors what a gateway produces when exporting tags: the
//! provider node with every tag nested under `tags`, custom properties
//! written back as top-level keys.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::core::error::Result;
use crate::tags::ResolvedProvider;

/// JSON document for a provider
pub fn provider_json(provider: &ResolvedProvider, include_types: bool) -> Result<Value> {
    let tags = if include_types {
        provider.root.children()
    } else {
        provider.tags()
    };

    let mut value = provider.root.config.to_minimal_json()?;
    if let Value::Object(map) = &mut value {
        map.insert("tags".to_string(), serde_json::to_value(tags)?);
    }
    Ok(value)
}

/// Write a provider as pretty-printed JSON
pub fn write_provider<W: Write>(
    provider: &ResolvedProvider,
    include_types: bool,
    writer: W,
) -> Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, &provider_json(provider, include_types)?)?;
    writeln!(writer)?;
    Ok(())
}

/// Export a provider to a JSON file
pub fn export_provider(
    provider: &ResolvedProvider,
    path: &Path,
    include_types: bool,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_provider(provider, include_types, &mut writer)?;
    writer.flush()?;

    info!(
        provider = %provider.record.name,
        path = %path.display(),
        nodes = provider.root.subtree_len(),
        "Exported provider"
    );
    Ok(())
}
