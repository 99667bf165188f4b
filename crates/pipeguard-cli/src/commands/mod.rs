//! CLI command implementations for `pipeguard`.
//!
//! - [`validate`] -- Run the policy gate against a pipeline file.
//! - [`request`] -- Print the decision request without sending it.
//! - [`config_cmd`] -- Show the resolved configuration.

pub mod config_cmd;
pub mod request;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use pipeguard_policy::InMemoryPipelineStore;
use pipeguard_types::PipelineDefinition;

/// Read a single pipeline document from a JSON file.
pub async fn read_pipeline(path: &Path) -> anyhow::Result<PipelineDefinition> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read pipeline {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse pipeline {}", path.display()))
}

/// Build the pipeline store from a JSON array of pipelines, or an empty
/// store when no file is given.
pub async fn read_store(path: Option<&Path>) -> anyhow::Result<InMemoryPipelineStore> {
    let Some(path) = path else {
        return Ok(InMemoryPipelineStore::default());
    };
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read pipeline store {}", path.display()))?;
    let pipelines: Vec<PipelineDefinition> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse pipeline store {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        pipelines = pipelines.len(),
        "loaded pipeline store"
    );
    Ok(InMemoryPipelineStore::new(pipelines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_pipeline_keeps_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.json");
        std::fs::write(
            &path,
            r#"{"application": "myapp", "name": "deploy", "stages": [], "limitConcurrent": true}"#,
        )
        .unwrap();

        let pipeline = read_pipeline(&path).await.unwrap();
        assert_eq!(pipeline.application.as_deref(), Some("myapp"));
        assert!(pipeline.is_initial_save());
        assert_eq!(pipeline.extra["limitConcurrent"], true);
    }

    #[tokio::test]
    async fn read_store_defaults_to_empty() {
        let store = read_store(None).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn read_store_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"application": "myapp"}"#).unwrap();

        let err = read_store(Some(&path)).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to parse pipeline store"));
    }

    #[tokio::test]
    async fn read_store_loads_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"[{"application": "myapp", "name": "deploy"},
                {"application": "myapp", "name": "build"}]"#,
        )
        .unwrap();

        let store = read_store(Some(&path)).await.unwrap();
        assert_eq!(store.len(), 2);
    }
}
