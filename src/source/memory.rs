//! In-memory source, for embedding and tests

use super::RowSource;
use crate::core::error::Result;
use crate::tags::{TagProviderRecord, TagRow};

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    providers: Vec<TagProviderRecord>,
    rows: Vec<TagRow>,
}

impl MemorySource {
    pub fn new(providers: Vec<TagProviderRecord>, rows: Vec<TagRow>) -> Self {
        Self { providers, rows }
    }

    pub fn add_provider(&mut self, record: TagProviderRecord) {
        self.providers.push(record);
    }

    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = TagRow>) {
        self.rows.extend(rows);
    }
}

impl RowSource for MemorySource {
    fn providers(&self) -> Result<Vec<TagProviderRecord>> {
        let mut providers = self.providers.clone();
        providers.sort_by_key(|record| record.id);
        Ok(providers)
    }

    fn tag_rows(&self, provider_id: i32) -> Result<Vec<TagRow>> {
        let mut rows: Vec<TagRow> = self
            .rows
            .iter()
            .filter(|row| row.provider_id == provider_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }
}
