//! Converter capabilities.
//!
//! A converter participates in the pipeline at up to four granularities:
//!
//! | Capability               | Runs on                                   |
//! |--------------------------|-------------------------------------------|
//! | [`ContentDataConverter`] | the whole document, before and after      |
//! | [`ContentItemConverter`] | each array item / component object        |
//! | [`ContentFieldConverter`]| each root field's partition map           |
//! | [`ContentValueConverter`]| each leaf slot                            |
//!
//! A single type may implement several of them. It advertises which ones
//! through the `as_*` methods of [`Converter`]; registration calls each once
//! and files the converter into the matching lists.

use std::sync::Arc;

use crate::content::{ContentData, ContentFieldData};
use crate::error::ConvertError;
use crate::schema::{Field, FieldCollection, Schema};
use crate::value::{JsonObject, JsonValue};

/// Outcome of a field converter.
///
/// `Remove` drops the field from the output. `Keep` with empty data is a
/// valid, present field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAction {
    Keep(Arc<ContentFieldData>),
    Remove,
}

/// Outcome of a value converter, and of the engine's per-slot dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueAction {
    /// Keep the slot. A value that is not [`JsonValue::ptr_eq`] to the input
    /// replaces it.
    Keep(JsonValue),
    /// Drop the enclosing slot.
    Remove,
}

/// Whole-document hooks.
pub trait ContentDataConverter: Send + Sync {
    /// Runs on the input document before the walk and may modify it.
    fn convert_data_before(&self, _schema: &Schema, _data: &mut ContentData) -> Result<(), ConvertError> {
        Ok(())
    }

    /// Runs on the fully rewritten output document.
    fn convert_data_after(&self, _schema: &Schema, _data: &mut ContentData) -> Result<(), ConvertError> {
        Ok(())
    }
}

/// Hooks around one nested record (an array item or a component).
///
/// Implementations must not mutate the shared object; return a new [`Arc`]
/// to change it.
pub trait ContentItemConverter: Send + Sync {
    fn convert_item_before(
        &self,
        _parent: &Field,
        item: Arc<JsonObject>,
        _fields: &FieldCollection,
    ) -> Result<Arc<JsonObject>, ConvertError> {
        Ok(item)
    }

    fn convert_item_after(
        &self,
        _parent: &Field,
        item: Arc<JsonObject>,
        _fields: &FieldCollection,
    ) -> Result<Arc<JsonObject>, ConvertError> {
        Ok(item)
    }
}

/// Hooks around the partition map of one root field.
pub trait ContentFieldConverter: Send + Sync {
    fn convert_field_before(
        &self,
        _field: &Field,
        data: Arc<ContentFieldData>,
    ) -> Result<FieldAction, ConvertError> {
        Ok(FieldAction::Keep(data))
    }

    fn convert_field_after(
        &self,
        _field: &Field,
        data: Arc<ContentFieldData>,
    ) -> Result<FieldAction, ConvertError> {
        Ok(FieldAction::Keep(data))
    }
}

/// Leaf-level conversion.
pub trait ContentValueConverter: Send + Sync {
    /// Convert one leaf slot. `parent` is the array or component field that
    /// owns the slot, or `None` for root fields.
    fn convert_value(
        &self,
        field: &Field,
        value: JsonValue,
        parent: Option<&Field>,
    ) -> Result<ValueAction, ConvertError>;
}

/// A pluggable converter and the capabilities it offers.
///
/// Every method defaults to "not supported". Implementors return
/// `Some(self)` for each capability trait they implement.
pub trait Converter: Send + Sync {
    fn as_data_converter(self: Arc<Self>) -> Option<Arc<dyn ContentDataConverter>> {
        None
    }

    fn as_item_converter(self: Arc<Self>) -> Option<Arc<dyn ContentItemConverter>> {
        None
    }

    fn as_field_converter(self: Arc<Self>) -> Option<Arc<dyn ContentFieldConverter>> {
        None
    }

    fn as_value_converter(self: Arc<Self>) -> Option<Arc<dyn ContentValueConverter>> {
        None
    }
}
