//! Schema-driven conversion of content documents.
//!
//! A [`ContentConverter`] rewrites a [`ContentData`] document against a
//! [`Schema`], running registered converters at four granularities: the whole
//! document, nested items, root fields and leaf values. Values that no longer
//! fit the schema are dropped rather than rejected, and unchanged subtrees
//! are shared with the input instead of being copied.
//!
//! ```
//! use std::sync::Arc;
//!
//! use content_convert_core::converters::{ExcludeChangedTypes, ExcludeHidden};
//! use content_convert_core::{ContentConverter, ContentData, ResolvedComponents, Schema};
//! use serde_json::json;
//!
//! let schema: Schema = serde_json::from_value(json!({
//!     "name": "post",
//!     "fields": [
//!         { "id": 1, "name": "title", "kind": "string" },
//!         { "id": 2, "name": "views", "kind": "number" }
//!     ]
//! }))?;
//!
//! let converter = ContentConverter::new(Arc::new(ResolvedComponents::new()), Arc::new(schema))
//!     .add(ExcludeHidden)
//!     .add(ExcludeChangedTypes);
//!
//! let data: ContentData = serde_json::from_value(json!({
//!     "title": { "iv": "Hello" },
//!     "views": { "iv": "not a number" },
//!     "legacy": { "iv": true }
//! }))?;
//!
//! let result = converter.convert(data)?;
//! assert_eq!(
//!     serde_json::to_value(&result)?,
//!     json!({ "title": { "iv": "Hello" }, "views": {} })
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod content;
pub mod converter;
pub mod converters;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod value;

pub use config::{ConvertOptions, LanguageConfig, LanguagesConfig};
pub use content::{ContentData, ContentFieldData, INVARIANT};
pub use converter::{
    ContentDataConverter, ContentFieldConverter, ContentItemConverter, ContentValueConverter,
    Converter, FieldAction, ValueAction,
};
pub use error::ConvertError;
pub use pipeline::ContentConverter;
pub use schema::{
    Component, ComponentResolver, Field, FieldCollection, FieldKind, Partitioning,
    ResolvedComponents, ScalarKind, Schema, DISCRIMINATOR,
};
pub use value::{JsonArray, JsonObject, JsonValue};
