//! Fills missing values with field defaults.

use std::sync::Arc;

use crate::config::LanguagesConfig;
use crate::content::{ContentData, ContentFieldData, INVARIANT};
use crate::converter::{ContentDataConverter, ContentItemConverter, Converter};
use crate::error::ConvertError;
use crate::schema::{Field, FieldCollection, Schema};
use crate::value::JsonObject;

/// Writes `default_value` into every missing or null slot of a field.
///
/// Root fields are filled before the walk, one slot per partition: `iv` for
/// invariant fields, every configured language for localized ones. Nested
/// fields are filled when their item is visited. Fields without a default
/// are left alone.
#[derive(Debug, Clone)]
pub struct AddDefaultValues {
    languages: LanguagesConfig,
}

impl AddDefaultValues {
    pub fn new(languages: LanguagesConfig) -> Self {
        Self { languages }
    }

    fn partitions<'a>(&'a self, field: &Field) -> Vec<&'a str> {
        if field.is_localized() {
            self.languages.codes().collect()
        } else {
            vec![INVARIANT]
        }
    }
}

impl Converter for AddDefaultValues {
    fn as_data_converter(self: Arc<Self>) -> Option<Arc<dyn ContentDataConverter>> {
        Some(self)
    }

    fn as_item_converter(self: Arc<Self>) -> Option<Arc<dyn ContentItemConverter>> {
        Some(self)
    }
}

impl ContentDataConverter for AddDefaultValues {
    fn convert_data_before(&self, schema: &Schema, data: &mut ContentData) -> Result<(), ConvertError> {
        for field in &schema.fields {
            let Some(default) = &field.default_value else {
                continue;
            };

            let mut missing = self.partitions(field);
            if let Some(existing) = data.get(&field.name) {
                missing.retain(|key| existing.get(key).map_or(true, |v| v.is_null()));
            }

            if missing.is_empty() {
                continue;
            }

            tracing::trace!(field = %field.name, partitions = ?missing, "adding default values");

            match data.get_mut(&field.name) {
                Some(existing) => {
                    for key in missing {
                        existing.insert(key, default.clone());
                    }
                }
                None => {
                    let filled: ContentFieldData =
                        missing.into_iter().map(|key| (key, default.clone())).collect();
                    data.insert(field.name.clone(), Arc::new(filled));
                }
            }
        }
        Ok(())
    }
}

impl ContentItemConverter for AddDefaultValues {
    fn convert_item_before(
        &self,
        _parent: &Field,
        item: Arc<JsonObject>,
        fields: &FieldCollection,
    ) -> Result<Arc<JsonObject>, ConvertError> {
        let mut result: Option<JsonObject> = None;

        for field in fields {
            let Some(default) = &field.default_value else {
                continue;
            };

            if item.get(&field.name).map_or(true, |v| v.is_null()) {
                result
                    .get_or_insert_with(|| (*item).clone())
                    .insert(field.name.clone(), default.clone());
            }
        }

        Ok(result.map(Arc::new).unwrap_or(item))
    }
}
