//! Static catalog of the AI models the backend can route to.
//!
//! The catalog is fixed at compile time; entries are never mutated.

/// Pseudo-identifier meaning "every model the user is eligible for".
pub const ALL_MODELS_ID: &str = "all-models";

/// Static description of one AI model endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Expert-tier models are only selectable by premium users.
    pub is_expert: bool,
}

impl ModelDescriptor {
    pub fn is_available_to(&self, is_premium: bool) -> bool {
        !self.is_expert || is_premium
    }
}

pub static AI_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "gemini",
        name: "Gemini 2.5",
        display_name: "Gemini 2.5 Pro",
        description: "Google's next-gen intelligence",
        is_expert: true,
    },
    ModelDescriptor {
        id: "gpt5",
        name: "GPT-5",
        display_name: "GPT-5 Chat",
        description: "OpenAI's future-leap model",
        is_expert: false,
    },
    ModelDescriptor {
        id: "grok",
        name: "Grok 4.1",
        display_name: "Grok 4.1",
        description: "xAI's real-time reasoning",
        is_expert: false,
    },
    ModelDescriptor {
        id: "deepseek",
        name: "DeepSeek",
        display_name: "DeepSeek",
        description: "Advanced logical reasoning",
        is_expert: true,
    },
];

pub fn all() -> &'static [ModelDescriptor] {
    AI_MODELS
}

pub fn find(id: &str) -> Option<&'static ModelDescriptor> {
    AI_MODELS.iter().find(|m| m.id == id)
}

/// Display name for a model id, falling back to the raw id for unknown models.
pub fn display_name(id: &str) -> &str {
    find(id).map(|m| m.display_name).unwrap_or(id)
}

/// Models the user may select, in registry order.
pub fn eligible(is_premium: bool) -> Vec<&'static ModelDescriptor> {
    AI_MODELS.iter().filter(|m| m.is_available_to(is_premium)).collect()
}

pub fn eligible_ids(is_premium: bool) -> Vec<String> {
    eligible(is_premium).into_iter().map(|m| m.id.to_string()).collect()
}

/// The model a selection collapses to: the first eligible registry entry.
pub fn default_model(is_premium: bool) -> &'static ModelDescriptor {
    eligible(is_premium).into_iter().next().unwrap_or(&AI_MODELS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = AI_MODELS.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), AI_MODELS.len());
    }

    #[test]
    fn free_users_only_see_standard_models() {
        assert_eq!(eligible_ids(false), vec!["gpt5", "grok"]);
        assert_eq!(eligible_ids(true).len(), AI_MODELS.len());
    }

    #[test]
    fn default_model_respects_tier() {
        assert_eq!(default_model(false).id, "gpt5");
        assert_eq!(default_model(true).id, "gemini");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(display_name("grok"), "Grok 4.1");
        assert_eq!(display_name("mystery"), "mystery");
    }
}
