//! Removes values whose shape no longer matches their field.

use std::sync::Arc;

use crate::converter::{ContentValueConverter, Converter, ValueAction};
use crate::error::ConvertError;
use crate::schema::{Field, FieldKind, ScalarKind};
use crate::value::JsonValue;

/// Drops leaf values that do not fit the field's scalar kind, for example
/// text stored in a field that was later changed to a number. Null always
/// fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeChangedTypes;

impl Converter for ExcludeChangedTypes {
    fn as_value_converter(self: Arc<Self>) -> Option<Arc<dyn ContentValueConverter>> {
        Some(self)
    }
}

impl ContentValueConverter for ExcludeChangedTypes {
    fn convert_value(
        &self,
        field: &Field,
        value: JsonValue,
        _parent: Option<&Field>,
    ) -> Result<ValueAction, ConvertError> {
        let FieldKind::Scalar(kind) = &field.kind else {
            return Ok(ValueAction::Keep(value));
        };

        if value.is_null() || fits(*kind, &value) {
            return Ok(ValueAction::Keep(value));
        }

        tracing::debug!(
            field = %field.name,
            expected = ?kind,
            actual = value.kind(),
            "removing value of changed type"
        );
        Ok(ValueAction::Remove)
    }
}

fn fits(kind: ScalarKind, value: &JsonValue) -> bool {
    match kind {
        ScalarKind::String | ScalarKind::DateTime => matches!(value, JsonValue::String(_)),
        ScalarKind::Number => matches!(value, JsonValue::Number(_)),
        ScalarKind::Boolean => matches!(value, JsonValue::Bool(_)),
        ScalarKind::Json => true,
        ScalarKind::Geolocation => value.as_object().is_some_and(|obj| {
            ["latitude", "longitude"]
                .iter()
                .all(|key| obj.get(*key).and_then(JsonValue::as_f64).is_some())
        }),
        ScalarKind::References | ScalarKind::Assets | ScalarKind::Tags => value
            .as_array()
            .is_some_and(|items| items.iter().all(|item| item.as_str().is_some())),
    }
}
