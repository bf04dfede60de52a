//! Removes fields marked as hidden.

use std::sync::Arc;

use crate::content::ContentFieldData;
use crate::converter::{ContentFieldConverter, ContentItemConverter, Converter, FieldAction};
use crate::error::ConvertError;
use crate::schema::{Field, FieldCollection};
use crate::value::JsonObject;

/// Drops hidden root fields and hidden nested fields.
///
/// Typically registered for public reads, where hidden fields must never
/// leave the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeHidden;

impl Converter for ExcludeHidden {
    fn as_item_converter(self: Arc<Self>) -> Option<Arc<dyn ContentItemConverter>> {
        Some(self)
    }

    fn as_field_converter(self: Arc<Self>) -> Option<Arc<dyn ContentFieldConverter>> {
        Some(self)
    }
}

impl ContentFieldConverter for ExcludeHidden {
    fn convert_field_before(
        &self,
        field: &Field,
        data: Arc<ContentFieldData>,
    ) -> Result<FieldAction, ConvertError> {
        if field.hidden {
            return Ok(FieldAction::Remove);
        }
        Ok(FieldAction::Keep(data))
    }
}

impl ContentItemConverter for ExcludeHidden {
    fn convert_item_before(
        &self,
        _parent: &Field,
        item: Arc<JsonObject>,
        fields: &FieldCollection,
    ) -> Result<Arc<JsonObject>, ConvertError> {
        let is_hidden = |key: &str| fields.by_name(key).is_some_and(|f| f.hidden);

        if !item.keys().any(|key| is_hidden(key.as_str())) {
            return Ok(item);
        }

        let mut result = (*item).clone();
        result.retain(|key, _| !is_hidden(key.as_str()));
        Ok(Arc::new(result))
    }
}
