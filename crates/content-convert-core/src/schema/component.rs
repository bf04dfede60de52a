//! Components and the registry that resolves them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::FieldCollection;

/// Reserved object key naming the component a value was written with.
pub const DISCRIMINATOR: &str = "schemaId";

/// A reusable nested record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub fields: FieldCollection,
}

impl Component {
    pub fn new(id: impl Into<String>, name: impl Into<String>, fields: FieldCollection) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields,
        }
    }
}

/// Resolves discriminator values to components.
pub trait ComponentResolver: Send + Sync {
    fn try_resolve(&self, id: &str) -> Option<&Component>;
}

/// In-memory component registry, keyed by component id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<Component>")]
pub struct ResolvedComponents(HashMap<String, Arc<Component>>);

impl ResolvedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, component: Component) -> Self {
        self.insert(component);
        self
    }

    pub fn insert(&mut self, component: Component) {
        self.0.insert(component.id.clone(), Arc::new(component));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ComponentResolver for ResolvedComponents {
    fn try_resolve(&self, id: &str) -> Option<&Component> {
        self.0.get(id).map(Arc::as_ref)
    }
}

impl FromIterator<Component> for ResolvedComponents {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|c| (c.id.clone(), Arc::new(c)))
                .collect(),
        )
    }
}

impl From<Vec<Component>> for ResolvedComponents {
    fn from(components: Vec<Component>) -> Self {
        components.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_registered_components_only() {
        let components: ResolvedComponents = serde_json::from_value(json!([
            { "id": "hero", "name": "Hero", "fields": [{ "id": 1, "name": "title", "kind": "string" }] },
            { "id": "text", "name": "Text", "fields": [] }
        ]))
        .unwrap();

        assert_eq!(components.len(), 2);
        assert_eq!(components.try_resolve("hero").unwrap().fields.len(), 1);
        assert!(components.try_resolve("video").is_none());
    }
}
