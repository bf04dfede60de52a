//! Field definitions.

use serde::{Deserialize, Serialize};

use super::FieldCollection;
use crate::value::JsonValue;

/// How the values of a root field are partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Partitioning {
    /// One value under the `iv` key.
    #[default]
    Invariant,
    /// One value per configured language.
    Language,
}

/// Value shape of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    DateTime,
    Json,
    Geolocation,
    References,
    Assets,
    Tags,
}

/// The structural kind of a field, which decides how the converter walks it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A leaf slot; values go straight to the value converters.
    Scalar(ScalarKind),
    /// An array of items, each an object shaped by the nested collection.
    Array(FieldCollection),
    /// A single component, with the component ids editors may pick from.
    /// Conversion only consults the component registry.
    Component(Vec<String>),
    /// An array of components, with the same editor id list.
    Components(Vec<String>),
}

/// A field of a schema, a component, or an array item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Field {
    /// Stable ordinal id, unique within its collection.
    pub id: u64,
    pub name: String,
    /// Only meaningful for root fields; nested values are never partitioned.
    #[serde(default)]
    pub partitioning: Partitioning,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    pub fn new(id: u64, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id,
            name: name.into(),
            partitioning: Partitioning::Invariant,
            hidden: false,
            default_value: None,
            kind,
        }
    }

    pub fn scalar(id: u64, name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(id, name, FieldKind::Scalar(kind))
    }

    pub fn array(id: u64, name: impl Into<String>, fields: FieldCollection) -> Self {
        Self::new(id, name, FieldKind::Array(fields))
    }

    pub fn component(id: u64, name: impl Into<String>) -> Self {
        Self::new(id, name, FieldKind::Component(Vec::new()))
    }

    pub fn components(id: u64, name: impl Into<String>) -> Self {
        Self::new(id, name, FieldKind::Components(Vec::new()))
    }

    pub fn localized(mut self) -> Self {
        self.partitioning = Partitioning::Language;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<JsonValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the component ids offered for a component field.
    pub fn allowing<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldKind::Component(schema_ids) | FieldKind::Components(schema_ids) = &mut self.kind {
            *schema_ids = ids.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn is_localized(&self) -> bool {
        self.partitioning == Partitioning::Language
    }
}

// ---------------------------------------------------------------------------
// Serialized form
// ---------------------------------------------------------------------------

/// Flat, `kind`-tagged representation used on the wire.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum FieldKindRepr {
    String,
    Number,
    Boolean,
    DateTime,
    Json,
    Geolocation,
    References,
    Assets,
    Tags,
    Array {
        fields: FieldCollection,
    },
    Component {
        #[serde(default, rename = "schema-ids")]
        schema_ids: Vec<String>,
    },
    Components {
        #[serde(default, rename = "schema-ids")]
        schema_ids: Vec<String>,
    },
}

impl From<FieldKindRepr> for FieldKind {
    fn from(repr: FieldKindRepr) -> Self {
        match repr {
            FieldKindRepr::String => Self::Scalar(ScalarKind::String),
            FieldKindRepr::Number => Self::Scalar(ScalarKind::Number),
            FieldKindRepr::Boolean => Self::Scalar(ScalarKind::Boolean),
            FieldKindRepr::DateTime => Self::Scalar(ScalarKind::DateTime),
            FieldKindRepr::Json => Self::Scalar(ScalarKind::Json),
            FieldKindRepr::Geolocation => Self::Scalar(ScalarKind::Geolocation),
            FieldKindRepr::References => Self::Scalar(ScalarKind::References),
            FieldKindRepr::Assets => Self::Scalar(ScalarKind::Assets),
            FieldKindRepr::Tags => Self::Scalar(ScalarKind::Tags),
            FieldKindRepr::Array { fields } => Self::Array(fields),
            FieldKindRepr::Component { schema_ids } => Self::Component(schema_ids),
            FieldKindRepr::Components { schema_ids } => Self::Components(schema_ids),
        }
    }
}

impl From<FieldKind> for FieldKindRepr {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(ScalarKind::String) => Self::String,
            FieldKind::Scalar(ScalarKind::Number) => Self::Number,
            FieldKind::Scalar(ScalarKind::Boolean) => Self::Boolean,
            FieldKind::Scalar(ScalarKind::DateTime) => Self::DateTime,
            FieldKind::Scalar(ScalarKind::Json) => Self::Json,
            FieldKind::Scalar(ScalarKind::Geolocation) => Self::Geolocation,
            FieldKind::Scalar(ScalarKind::References) => Self::References,
            FieldKind::Scalar(ScalarKind::Assets) => Self::Assets,
            FieldKind::Scalar(ScalarKind::Tags) => Self::Tags,
            FieldKind::Array(fields) => Self::Array { fields },
            FieldKind::Component(schema_ids) => Self::Component { schema_ids },
            FieldKind::Components(schema_ids) => Self::Components { schema_ids },
        }
    }
}

impl Serialize for FieldKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FieldKindRepr::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FieldKindRepr::deserialize(deserializer).map(Self::from)
    }
}
