//! Read-only access to stored pipelines.
//!
//! The gate never writes pipelines. In delta mode it needs the currently
//! stored revision of the pipeline being saved, which it finds by listing
//! the application's pipelines through [`PipelineLookup`].

use async_trait::async_trait;
use pipeguard_types::PipelineDefinition;

use crate::error::StoreError;

/// Lookup of stored pipelines by application.
#[async_trait]
pub trait PipelineLookup: Send + Sync {
    /// All pipelines stored under `application`, in store order.
    ///
    /// `refresh` asks a caching store to bypass its cache.
    async fn pipelines_by_application(
        &self,
        application: &str,
        refresh: bool,
    ) -> Result<Vec<PipelineDefinition>, StoreError>;
}

/// A fixed, in-memory pipeline store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPipelineStore {
    pipelines: Vec<PipelineDefinition>,
}

impl InMemoryPipelineStore {
    /// Create a store holding `pipelines` in the given order.
    pub fn new(pipelines: Vec<PipelineDefinition>) -> Self {
        Self { pipelines }
    }

    /// Number of stored pipelines across all applications.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[async_trait]
impl PipelineLookup for InMemoryPipelineStore {
    async fn pipelines_by_application(
        &self,
        application: &str,
        _refresh: bool,
    ) -> Result<Vec<PipelineDefinition>, StoreError> {
        Ok(self
            .pipelines
            .iter()
            .filter(|p| p.application.as_deref() == Some(application))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_by_application_in_order() {
        let store = InMemoryPipelineStore::new(vec![
            PipelineDefinition::new("myapp", "build"),
            PipelineDefinition::new("other", "build"),
            PipelineDefinition::new("myapp", "deploy"),
        ]);
        assert_eq!(store.len(), 3);

        let found = store.pipelines_by_application("myapp", true).await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.name_or_empty()).collect();
        assert_eq!(names, vec!["build", "deploy"]);
    }

    #[tokio::test]
    async fn unknown_application_is_empty() {
        let store = InMemoryPipelineStore::default();
        assert!(store.is_empty());
        let found = store.pipelines_by_application("myapp", false).await.unwrap();
        assert!(found.is_empty());
    }
}
