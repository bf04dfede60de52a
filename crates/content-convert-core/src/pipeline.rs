//! The content converter: registry plus rewrite engine.
//!
//! [`ContentConverter::convert`] walks a document field by field, using the
//! schema to decide how each value is shaped:
//!
//! - array fields hold objects, each converted against the nested fields;
//! - component fields hold an object tagged with [`DISCRIMINATOR`], converted
//!   against the resolved component;
//! - component-array fields hold a list of such objects;
//! - every other field is a leaf slot handed to the value converters.
//!
//! Values that do not fit the schema are removed, never rejected. Containers
//! are copied only when something below them changed; everything else is
//! shared with the input by reference.

use std::fmt;
use std::sync::Arc;

use crate::config::ConvertOptions;
use crate::content::{ContentData, ContentFieldData};
use crate::converter::{
    ContentDataConverter, ContentFieldConverter, ContentItemConverter, ContentValueConverter,
    Converter, FieldAction, ValueAction,
};
use crate::error::ConvertError;
use crate::schema::{ComponentResolver, Field, FieldCollection, FieldKind, Schema, DISCRIMINATOR};
use crate::value::{JsonArray, JsonObject, JsonValue};

/// A converter pipeline bound to one schema.
///
/// Build it once with [`add`](Self::add), then call
/// [`convert`](Self::convert) for as many documents as needed. The pipeline
/// holds no per-call state and can be shared across threads.
pub struct ContentConverter {
    components: Arc<dyn ComponentResolver>,
    schema: Arc<Schema>,
    options: ConvertOptions,
    data_converters: Vec<Arc<dyn ContentDataConverter>>,
    item_converters: Vec<Arc<dyn ContentItemConverter>>,
    field_converters: Vec<Arc<dyn ContentFieldConverter>>,
    value_converters: Vec<Arc<dyn ContentValueConverter>>,
}

impl ContentConverter {
    pub fn new(components: Arc<dyn ComponentResolver>, schema: Arc<Schema>) -> Self {
        Self {
            components,
            schema,
            options: ConvertOptions::default(),
            data_converters: Vec::new(),
            item_converters: Vec::new(),
            field_converters: Vec::new(),
            value_converters: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a converter under every capability it offers.
    pub fn add<C: Converter + 'static>(self, converter: C) -> Self {
        self.add_shared(Arc::new(converter))
    }

    /// Register a shared converter under every capability it offers.
    ///
    /// Converters run in registration order, for both the before and the
    /// after phase of each granularity.
    pub fn add_shared(mut self, converter: Arc<dyn Converter>) -> Self {
        if let Some(c) = converter.clone().as_data_converter() {
            self.data_converters.push(c);
        }
        if let Some(c) = converter.clone().as_item_converter() {
            self.item_converters.push(c);
        }
        if let Some(c) = converter.clone().as_field_converter() {
            self.field_converters.push(c);
        }
        if let Some(c) = converter.as_value_converter() {
            self.value_converters.push(c);
        }
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rewrite a document.
    ///
    /// The input is consumed: data converters may modify it before the walk.
    /// Unchanged field data and values in the result are the same
    /// allocations as in the input.
    pub fn convert(&self, mut content: ContentData) -> Result<ContentData, ConvertError> {
        for converter in &self.data_converters {
            converter.convert_data_before(&self.schema, &mut content)?;
        }

        let mut result = ContentData::with_capacity(content.len());

        for (field_name, field_data) in content.iter() {
            let Some(field_data) = field_data else {
                continue;
            };

            let Some(field) = self.schema.field_by_name(field_name) else {
                tracing::debug!(field = %field_name, "dropping field that is not in the schema");
                continue;
            };

            let Some(data) = self.convert_field_before(field, field_data.clone())? else {
                continue;
            };

            let data = self.convert_values(field, data)?;

            if let Some(data) = self.convert_field_after(field, data)? {
                result.insert(field.name.clone(), data);
            }
        }

        for converter in &self.data_converters {
            converter.convert_data_after(&self.schema, &mut result)?;
        }

        Ok(result)
    }

    fn convert_field_before(
        &self,
        field: &Field,
        mut data: Arc<ContentFieldData>,
    ) -> Result<Option<Arc<ContentFieldData>>, ConvertError> {
        for converter in &self.field_converters {
            match converter.convert_field_before(field, data)? {
                FieldAction::Keep(new_data) => data = new_data,
                FieldAction::Remove => {
                    tracing::debug!(field = %field.name, "field removed before conversion");
                    return Ok(None);
                }
            }
        }
        Ok(Some(data))
    }

    fn convert_field_after(
        &self,
        field: &Field,
        mut data: Arc<ContentFieldData>,
    ) -> Result<Option<Arc<ContentFieldData>>, ConvertError> {
        for converter in &self.field_converters {
            match converter.convert_field_after(field, data)? {
                FieldAction::Keep(new_data) => data = new_data,
                FieldAction::Remove => {
                    tracing::debug!(field = %field.name, "field removed after conversion");
                    return Ok(None);
                }
            }
        }
        Ok(Some(data))
    }

    fn convert_values(
        &self,
        field: &Field,
        source: Arc<ContentFieldData>,
    ) -> Result<Arc<ContentFieldData>, ConvertError> {
        let mut result: Option<ContentFieldData> = None;

        for (partition, old_value) in source.iter() {
            match self.convert_by_kind(field, old_value, None, 0)? {
                ValueAction::Remove => {
                    result
                        .get_or_insert_with(|| (*source).clone())
                        .remove(partition);
                }
                ValueAction::Keep(new_value) if !new_value.ptr_eq(old_value) => {
                    result
                        .get_or_insert_with(|| (*source).clone())
                        .insert(partition.clone(), new_value);
                }
                ValueAction::Keep(_) => {}
            }
        }

        Ok(result.map(Arc::new).unwrap_or(source))
    }

    /// Dispatch one slot by the structural kind of its field.
    ///
    /// `depth` counts the nested records enclosing the slot.
    fn convert_by_kind(
        &self,
        field: &Field,
        value: &JsonValue,
        parent: Option<&Field>,
        depth: usize,
    ) -> Result<ValueAction, ConvertError> {
        match &field.kind {
            FieldKind::Array(fields) => self.convert_array(field, fields, value, depth),
            FieldKind::Component(_) => self.convert_component(field, value, depth),
            FieldKind::Components(_) => self.convert_components(field, value, depth),
            FieldKind::Scalar(_) => self.convert_value(field, value.clone(), parent),
        }
    }

    fn convert_array(
        &self,
        field: &Field,
        fields: &FieldCollection,
        value: &JsonValue,
        depth: usize,
    ) -> Result<ValueAction, ConvertError> {
        let Some(array) = value.as_array() else {
            tracing::trace!(field = %field.name, kind = value.kind(), "array field without array value");
            return Ok(ValueAction::Remove);
        };

        compact(array, |item| self.convert_array_item(field, fields, item, depth)).map(ValueAction::Keep)
    }

    fn convert_array_item(
        &self,
        field: &Field,
        fields: &FieldCollection,
        value: &JsonValue,
        depth: usize,
    ) -> Result<ValueAction, ConvertError> {
        let Some(obj) = value.as_object() else {
            return Ok(ValueAction::Remove);
        };

        if !self.within_depth(field, depth) {
            return Ok(ValueAction::Remove);
        }

        let converted = self.convert_nested(fields, obj.clone(), field, depth + 1)?;
        Ok(ValueAction::Keep(JsonValue::Object(converted)))
    }

    fn convert_components(
        &self,
        field: &Field,
        value: &JsonValue,
        depth: usize,
    ) -> Result<ValueAction, ConvertError> {
        let Some(array) = value.as_array() else {
            tracing::trace!(field = %field.name, kind = value.kind(), "components field without array value");
            return Ok(ValueAction::Remove);
        };

        compact(array, |item| self.convert_component(field, item, depth)).map(ValueAction::Keep)
    }

    fn convert_component(
        &self,
        field: &Field,
        value: &JsonValue,
        depth: usize,
    ) -> Result<ValueAction, ConvertError> {
        let Some(obj) = value.as_object() else {
            return Ok(ValueAction::Remove);
        };

        let Some(discriminator) = obj.get(DISCRIMINATOR) else {
            tracing::trace!(field = %field.name, "component without discriminator");
            return Ok(ValueAction::Remove);
        };

        let id = discriminator.to_string();

        let Some(component) = self.components.try_resolve(&id) else {
            tracing::debug!(field = %field.name, component = %id, "dropping unknown component");
            return Ok(ValueAction::Remove);
        };

        if !self.within_depth(field, depth) {
            return Ok(ValueAction::Remove);
        }

        let converted = self.convert_nested(&component.fields, obj.clone(), field, depth + 1)?;
        Ok(ValueAction::Keep(JsonValue::Object(converted)))
    }

    fn within_depth(&self, field: &Field, depth: usize) -> bool {
        if depth < self.options.max_depth {
            return true;
        }

        tracing::warn!(
            field = %field.name,
            max_depth = self.options.max_depth,
            "nesting limit reached, dropping nested record"
        );
        false
    }

    /// Convert one nested record. Never removes the record itself; an item
    /// whose fields were all removed comes back as an empty object.
    fn convert_nested(
        &self,
        fields: &FieldCollection,
        mut source: Arc<JsonObject>,
        parent: &Field,
        depth: usize,
    ) -> Result<Arc<JsonObject>, ConvertError> {
        for converter in &self.item_converters {
            source = converter.convert_item_before(parent, source, fields)?;
        }

        let mut result: Option<JsonObject> = None;

        for (key, old_value) in source.iter() {
            let action = if let Some(field) = fields.by_name(key) {
                self.convert_by_kind(field, old_value, Some(parent), depth)?
            } else if key == DISCRIMINATOR {
                continue;
            } else {
                tracing::trace!(parent = %parent.name, key = %key, "dropping unknown nested key");
                ValueAction::Remove
            };

            match action {
                ValueAction::Remove => {
                    result
                        .get_or_insert_with(|| (*source).clone())
                        .shift_remove(key);
                }
                ValueAction::Keep(new_value) if !new_value.ptr_eq(old_value) => {
                    result
                        .get_or_insert_with(|| (*source).clone())
                        .insert(key.clone(), new_value);
                }
                ValueAction::Keep(_) => {}
            }
        }

        let mut result = result.map(Arc::new).unwrap_or(source);

        for converter in &self.item_converters {
            result = converter.convert_item_after(parent, result, fields)?;
        }

        Ok(result)
    }

    fn convert_value(
        &self,
        field: &Field,
        mut value: JsonValue,
        parent: Option<&Field>,
    ) -> Result<ValueAction, ConvertError> {
        for converter in &self.value_converters {
            match converter.convert_value(field, value, parent)? {
                ValueAction::Keep(new_value) => value = new_value,
                ValueAction::Remove => return Ok(ValueAction::Remove),
            }
        }
        Ok(ValueAction::Keep(value))
    }
}

impl fmt::Debug for ContentConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentConverter")
            .field("schema", &self.schema.name)
            .field("options", &self.options)
            .field("data_converters", &self.data_converters.len())
            .field("item_converters", &self.item_converters.len())
            .field("field_converters", &self.field_converters.len())
            .field("value_converters", &self.value_converters.len())
            .finish()
    }
}

/// Convert every element of `source`, dropping removed ones.
///
/// A new array is only allocated once an element is removed or replaced;
/// until then the original is reused.
fn compact<F>(source: &Arc<JsonArray>, mut convert: F) -> Result<JsonValue, ConvertError>
where
    F: FnMut(&JsonValue) -> Result<ValueAction, ConvertError>,
{
    let mut result: Option<JsonArray> = None;

    for (index, old_value) in source.iter().enumerate() {
        match convert(old_value)? {
            ValueAction::Remove => {
                result.get_or_insert_with(|| source[..index].to_vec());
            }
            ValueAction::Keep(new_value) => match result.as_mut() {
                Some(items) => items.push(new_value),
                None if !new_value.ptr_eq(old_value) => {
                    let mut items = Vec::with_capacity(source.len());
                    items.extend_from_slice(&source[..index]);
                    items.push(new_value);
                    result = Some(items);
                }
                None => {}
            },
        }
    }

    Ok(match result {
        Some(items) => JsonValue::array(items),
        None => JsonValue::Array(Arc::clone(source)),
    })
}
