//! Shared types used across lmsync modules
//!
//! Contains model descriptors and the capability filter applied to them.

use serde::Deserialize;

/// Kind of model reported by LM Studio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Chat/completion model
    Llm,
    /// Embedding model
    Embedding,
    /// Anything this tool does not recognize
    #[serde(other)]
    Unknown,
}

impl ModelKind {
    /// Label used in the model listing
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Embedding => "embedding",
            Self::Unknown => "?",
        }
    }
}

/// A model discovered from the LM Studio API
///
/// Immutable once fetched; lives for a single CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// Model identifier (the v1 API `key` field)
    pub id: String,
    /// Model kind (only `llm` models are rendered into configs)
    pub kind: ModelKind,
    /// Maximum context length in tokens, when reported
    pub max_context_length: Option<u64>,
    /// Whether the model was trained for tool use
    pub tool_calling: bool,
    /// Whether the model accepts image input
    pub vision: bool,
}

impl ModelDescriptor {
    /// Tool-calling support as the filter sees it: non-LLM models never qualify
    pub fn effective_tool_calling(&self) -> bool {
        self.kind == ModelKind::Llm && self.tool_calling
    }

    /// Vision support as the filter sees it: non-LLM models never qualify
    pub fn effective_vision(&self) -> bool {
        self.kind == ModelKind::Llm && self.vision
    }
}

/// Tri-state capability predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapabilityFilter {
    /// No constraint
    #[default]
    Any,
    /// Capability must be present
    Required,
    /// Capability must be absent
    Excluded,
}

impl CapabilityFilter {
    /// Build from a pair of mutually exclusive CLI flags
    pub fn from_flags(required: bool, excluded: bool) -> Self {
        if required {
            Self::Required
        } else if excluded {
            Self::Excluded
        } else {
            Self::Any
        }
    }

    /// Label used in the model listing
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Required => "required",
            Self::Excluded => "exclude",
        }
    }

    fn accepts(&self, present: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Required => present,
            Self::Excluded => !present,
        }
    }
}

/// User-supplied model filter, constructed from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Only keep models with a reported context length >= this bound
    pub min_context: Option<u64>,
    /// Tool-calling constraint
    pub tools: CapabilityFilter,
    /// Vision constraint
    pub vision: CapabilityFilter,
}

impl FilterCriteria {
    /// Check whether a single model matches every set predicate
    pub fn matches(&self, model: &ModelDescriptor) -> bool {
        if let Some(min) = self.min_context {
            match model.max_context_length {
                Some(context) if context >= min => {}
                _ => return false,
            }
        }

        self.tools.accepts(model.effective_tool_calling())
            && self.vision.accepts(model.effective_vision())
    }
}

/// Filter a model list, preserving input order
pub fn filter_models(models: &[ModelDescriptor], criteria: &FilterCriteria) -> Vec<ModelDescriptor> {
    models
        .iter()
        .filter(|m| criteria.matches(m))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm(id: &str, context: u64, tools: bool, vision: bool) -> ModelDescriptor {
        ModelDescriptor {
            id: id.to_string(),
            kind: ModelKind::Llm,
            max_context_length: Some(context),
            tool_calling: tools,
            vision,
        }
    }

    fn embedding(id: &str) -> ModelDescriptor {
        ModelDescriptor {
            id: id.to_string(),
            kind: ModelKind::Embedding,
            max_context_length: Some(2048),
            tool_calling: false,
            vision: false,
        }
    }

    #[test]
    fn test_min_context_filter() {
        let models = vec![llm("m1", 8192, true, false), llm("m2", 65536, false, true)];
        let criteria = FilterCriteria {
            min_context: Some(32768),
            ..Default::default()
        };

        let kept = filter_models(&models, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "m2");
    }

    #[test]
    fn test_min_context_requires_reported_length() {
        let mut model = llm("m1", 8192, true, false);
        model.max_context_length = None;
        let criteria = FilterCriteria {
            min_context: Some(1),
            ..Default::default()
        };

        assert!(!criteria.matches(&model));
    }

    #[test]
    fn test_tools_filter() {
        let models = vec![
            llm("a", 4096, true, false),
            llm("b", 4096, false, false),
            embedding("e"),
        ];

        let required = FilterCriteria {
            tools: CapabilityFilter::Required,
            ..Default::default()
        };
        let kept: Vec<_> = filter_models(&models, &required);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");

        // Embeddings have no capabilities, so excluding tools keeps them
        let excluded = FilterCriteria {
            tools: CapabilityFilter::Excluded,
            ..Default::default()
        };
        let kept: Vec<_> = filter_models(&models, &excluded);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "b");
        assert_eq!(kept[1].id, "e");
    }

    #[test]
    fn test_vision_filter_on_embedding() {
        let criteria = FilterCriteria {
            vision: CapabilityFilter::Required,
            ..Default::default()
        };
        assert!(!criteria.matches(&embedding("e")));
    }

    #[test]
    fn test_unset_criteria_keep_everything_in_order() {
        let models = vec![llm("z", 1, false, false), llm("a", 1, true, true)];
        let kept = filter_models(&models, &FilterCriteria::default());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].id, "z");
        assert_eq!(kept[1].id, "a");
    }

    #[test]
    fn test_capability_filter_from_flags() {
        assert_eq!(
            CapabilityFilter::from_flags(true, false),
            CapabilityFilter::Required
        );
        assert_eq!(
            CapabilityFilter::from_flags(false, true),
            CapabilityFilter::Excluded
        );
        assert_eq!(
            CapabilityFilter::from_flags(false, false),
            CapabilityFilter::Any
        );
    }
}
