//! In-memory document store for tests of the API and HTTP layers.

use async_trait::async_trait;
use mongodb::bson::Document;
use std::collections::HashMap;

use crate::prelude::*;
use super::{DocumentStore, EqFilter, StoreError};


#[derive(Default)]
pub(crate) struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
    unavailable: bool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A store that fails every lookup as if the server was unreachable.
    pub(crate) fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub(crate) fn insert(&mut self, collection: &str, doc: Document) -> &mut Self {
        self.collections.entry(collection.to_owned()).or_default().push(doc);
        self
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: EqFilter<'_>,
    ) -> Result<Option<Document>, StoreError> {
        if self.unavailable {
            return Err(anyhow!("server selection timeout: connection refused").into());
        }

        let matches = |doc: &&Document| {
            doc.get_str(filter.field).is_ok_and(|v| v == filter.value)
        };
        let out = self.collections.get(collection)
            .and_then(|docs| docs.iter().find(matches))
            .cloned();
        Ok(out)
    }
}
