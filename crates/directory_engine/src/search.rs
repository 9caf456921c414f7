use std::sync::Arc;

use directory_core::{NormalizedResult, Schema};
use directory_logging::{dir_info, dir_warn};
use futures_util::future::join_all;

use crate::store::RemoteStore;
use crate::SearchError;

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub collections: Vec<String>,
    /// Records fetched per collection.
    pub fetch_cap: usize,
    /// Origin relative image paths are resolved against.
    pub origin: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            collections: vec!["websites".into(), "images".into(), "videos".into()],
            fetch_cap: 500,
            origin: "http://localhost".into(),
        }
    }
}

/// Fans one query out across the configured collections.
///
/// Staleness is not decided here: results go back tagged with the token of
/// the request and the session discards them if a newer search started.
pub struct SearchAggregator {
    store: Arc<dyn RemoteStore>,
    schema: Schema,
    settings: SearchSettings,
}

impl SearchAggregator {
    pub fn new(store: Arc<dyn RemoteStore>, schema: Schema, settings: SearchSettings) -> Self {
        Self {
            store,
            schema,
            settings,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Matches and normalizes records of every collection. A failing
    /// collection is logged and left out; only an unreachable store fails the
    /// whole search.
    pub async fn search(&self, query: &str) -> Result<Vec<NormalizedResult>, SearchError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.store
            .connection_ready()
            .await
            .map_err(|err| SearchError::Connectivity(err.to_string()))?;

        let fetches = self.settings.collections.iter().map(|name| async move {
            let fetched = self
                .store
                .fetch_collection(name, self.settings.fetch_cap)
                .await;
            (name, fetched)
        });

        let mut results = Vec::new();
        for (name, fetched) in join_all(fetches).await {
            match fetched {
                Ok(records) => results.extend(
                    records
                        .iter()
                        .filter(|record| self.schema.matches(record, &query))
                        .map(|record| self.schema.normalize(name, record, &self.settings.origin)),
                ),
                Err(err) => dir_warn!("Skipping collection {}: {}", name, err),
            }
        }

        dir_info!("Search '{}' matched {} records", query, results.len());
        Ok(results)
    }
}
