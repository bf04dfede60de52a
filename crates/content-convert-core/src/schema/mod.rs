//! Schema model: field definitions, nested field collections and components.
//!
//! The schema is an input to the converter, not something it owns. These
//! types are the minimal shape the rewrite engine needs: a name-indexed field
//! lookup per collection, the structural kind of each field, and a way to
//! resolve component ids to their field collections.

mod component;
mod field;

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

pub use component::{Component, ComponentResolver, ResolvedComponents, DISCRIMINATOR};
pub use field::{Field, FieldKind, Partitioning, ScalarKind};

static FIELD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+(\-[a-zA-Z0-9]+)*$").expect("field name pattern is valid")
});

/// An ordered set of fields with name lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct FieldCollection {
    ordered: Vec<Field>,
    by_name: HashMap<String, usize>,
    by_lower_name: HashMap<String, usize>,
}

impl FieldCollection {
    /// Build a collection, rejecting invalid names and duplicate names or ids.
    pub fn new(fields: Vec<Field>) -> Result<Self, ConvertError> {
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut by_lower_name = HashMap::with_capacity(fields.len());
        let mut ids = HashSet::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            if !FIELD_NAME.is_match(&field.name) {
                return Err(ConvertError::schema(
                    &field.name,
                    "field name must be alphanumeric, optionally separated by dashes",
                ));
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(ConvertError::schema(&field.name, "duplicate field name"));
            }
            if !ids.insert(field.id) {
                return Err(ConvertError::schema(
                    &field.name,
                    format!("duplicate field id {}", field.id),
                ));
            }
            // First field wins when names only differ by case.
            by_lower_name
                .entry(field.name.to_ascii_lowercase())
                .or_insert(index);
        }

        Ok(Self {
            ordered: fields,
            by_name,
            by_lower_name,
        })
    }

    /// Exact name lookup.
    pub fn by_name(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.ordered[i])
    }

    /// Exact lookup, falling back to an ASCII case-insensitive match.
    pub fn by_name_ignore_case(&self, name: &str) -> Option<&Field> {
        self.by_name(name).or_else(|| {
            self.by_lower_name
                .get(&name.to_ascii_lowercase())
                .map(|&i| &self.ordered[i])
        })
    }

    pub fn by_id(&self, id: u64) -> Option<&Field> {
        self.ordered.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl PartialEq for FieldCollection {
    fn eq(&self, other: &Self) -> bool {
        self.ordered == other.ordered
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<Field>> for FieldCollection {
    type Error = ConvertError;

    fn try_from(fields: Vec<Field>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldCollection> for Vec<Field> {
    fn from(collection: FieldCollection) -> Self {
        collection.ordered
    }
}

/// A content schema: a name and its root fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: FieldCollection,
}

impl Schema {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, ConvertError> {
        Ok(Self {
            name: name.into(),
            fields: FieldCollection::new(fields)?,
        })
    }

    /// Resolve a document key to its root field.
    ///
    /// Keys match exactly first, then case-insensitively; the caller writes
    /// the output under [`Field::name`], the canonical spelling.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.by_name_ignore_case(name)
    }
}
