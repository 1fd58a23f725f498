//! Persona descriptor - immutable catalog entry for a conversational persona.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PersonaId, ProviderPersonaId, ReplicaId};

use super::PersonaVariant;

/// Catalog category of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaCategory {
    Professional,
    Educational,
    Entertainment,
    Wellness,
}

impl fmt::Display for PersonaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PersonaCategory::Professional => "professional",
            PersonaCategory::Educational => "educational",
            PersonaCategory::Entertainment => "entertainment",
            PersonaCategory::Wellness => "wellness",
        };
        write!(f, "{}", s)
    }
}

/// A persona the user can talk to, prebuilt or user-authored.
///
/// Owned by the catalog and never mutated by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDescriptor {
    pub id: PersonaId,
    pub name: String,
    pub category: PersonaCategory,
    pub description: String,
    pub avatar_url: String,
    /// Provider-side avatar model this persona is rendered with.
    pub replica_id: ReplicaId,
    /// Provider-side behavior profile, when one has been created.
    pub provider_persona_id: Option<ProviderPersonaId>,
    pub system_prompt: String,
    pub context: String,
    pub features: Vec<String>,
    pub use_case: String,
}

impl PersonaDescriptor {
    /// Creates a descriptor with the required identity fields; the rest start empty.
    pub fn new(
        id: impl Into<PersonaId>,
        name: impl Into<String>,
        category: PersonaCategory,
        replica_id: impl Into<ReplicaId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: String::new(),
            avatar_url: String::new(),
            replica_id: replica_id.into(),
            provider_persona_id: None,
            system_prompt: String::new(),
            context: String::new(),
            features: Vec::new(),
            use_case: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    pub fn with_provider_persona(mut self, id: impl Into<ProviderPersonaId>) -> Self {
        self.provider_persona_id = Some(id.into());
        self
    }

    pub fn with_prompt(mut self, system_prompt: impl Into<String>, context: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self.context = context.into();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = use_case.into();
        self
    }

    /// Voice variant driving greetings, canned replies and failure notices.
    pub fn variant(&self) -> PersonaVariant {
        PersonaVariant::from_persona_id(&self.id)
    }
}
