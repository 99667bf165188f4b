//! The pipeline document validated on every save.
//!
//! Only the fields the gate reasons about are typed. Everything else a
//! pipeline carries (triggers, parameters, notifications, ...) is kept in
//! [`PipelineDefinition::extra`] so the document sent for a decision is the
//! whole pipeline, not a projection of it.
//!
//! `name` and `stages` distinguish an absent key from a key holding `null`
//! (`None` vs `Some(None)`), so re-encoding writes back exactly the keys
//! that were submitted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A pipeline definition as submitted for create/update.
///
/// Identity for lookups is `(application, name)`, with the name compared
/// case-insensitively (see [`PipelineDefinition::is_named`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    /// Owning application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    /// Pipeline name, unique per application ignoring case.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,

    /// Ordered stage records. `Some(Some(vec![]))` marks a first-time save.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stages: Option<Option<Vec<Value>>>,

    /// Every other field of the document, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineDefinition {
    /// Create a pipeline with an application and a name and no stages field.
    pub fn new(application: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            application: Some(application.into()),
            name: Some(Some(name.into())),
            ..Self::default()
        }
    }

    /// Replace the stage list.
    pub fn with_stages(mut self, stages: Vec<Value>) -> Self {
        self.stages = Some(Some(stages));
        self
    }

    /// Set an additional top-level field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Whether this revision is a first-time save: the stage list is present
    /// and empty. An absent or `null` stage list is not a first-time save.
    pub fn is_initial_save(&self) -> bool {
        self.stages().is_some_and(<[Value]>::is_empty)
    }

    /// The pipeline name, if set and not `null`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref()?.as_deref()
    }

    /// The stage list, if set and not `null`.
    pub fn stages(&self) -> Option<&[Value]> {
        self.stages.as_ref()?.as_deref()
    }

    /// Case-insensitive name comparison.
    ///
    /// Both sides are folded with Unicode lowercase mapping character by
    /// character, without allocating.
    pub fn is_named(&self, name: &str) -> bool {
        self.name().is_some_and(|own| {
            own.chars()
                .flat_map(char::to_lowercase)
                .eq(name.chars().flat_map(char::to_lowercase))
        })
    }

    /// The pipeline name, or an empty string when unset.
    pub fn name_or_empty(&self) -> &str {
        self.name().unwrap_or_default()
    }
}

/// Deserialize a key holding `null` as `Some(None)`. Together with
/// `#[serde(default)]` an absent key stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_save_requires_present_empty_stages() {
        let p = PipelineDefinition::new("myapp", "deploy");
        assert!(!p.is_initial_save(), "absent stages is not a first save");

        let p = p.with_stages(vec![]);
        assert!(p.is_initial_save());

        let p = p.with_stages(vec![json!({"type": "wait"})]);
        assert!(!p.is_initial_save());
    }

    #[test]
    fn is_named_ignores_case() {
        let p = PipelineDefinition::new("myapp", "Deploy-Prod");
        assert!(p.is_named("deploy-prod"));
        assert!(p.is_named("DEPLOY-PROD"));
        assert!(!p.is_named("deploy"));
    }

    #[test]
    fn is_named_folds_non_ascii() {
        let p = PipelineDefinition::new("myapp", "DÉPLOIEMENT");
        assert!(p.is_named("déploiement"));
        assert!(!p.is_named("deploiement"));
    }

    #[test]
    fn null_stages_kept_and_not_initial_save() {
        let doc = json!({"application": "myapp", "name": null, "stages": null});
        let p: PipelineDefinition = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(p.stages, Some(None));
        assert_eq!(p.name, Some(None));
        assert!(p.stages().is_none());
        assert!(!p.is_initial_save());
        assert_eq!(p.name_or_empty(), "");
        assert_eq!(serde_json::to_value(&p).unwrap(), doc);
    }

    #[test]
    fn is_named_false_without_name() {
        let p = PipelineDefinition::default();
        assert!(!p.is_named(""));
    }

    #[test]
    fn unknown_fields_are_kept() {
        let doc = json!({
            "application": "myapp",
            "name": "deploy",
            "stages": [{"type": "bake", "refId": "1"}],
            "triggers": [{"type": "git", "branch": "main"}],
            "keepWaitingPipelines": false
        });
        let p: PipelineDefinition = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(p.application.as_deref(), Some("myapp"));
        assert_eq!(p.extra.len(), 2);
        assert_eq!(serde_json::to_value(&p).unwrap(), doc);
    }

    #[test]
    fn missing_application_deserializes_to_none() {
        let p: PipelineDefinition = serde_json::from_str(r#"{"name": "deploy"}"#).unwrap();
        assert!(p.application.is_none());
        assert_eq!(p.name_or_empty(), "deploy");
        assert!(p.stages.is_none());
    }
}
