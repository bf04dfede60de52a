//! Reference converters for the common read and write conversions.
//!
//! Each one is a plain [`Converter`](crate::Converter); register them on a
//! [`ContentConverter`](crate::ContentConverter) in the order they should run.

mod add_default_values;
mod exclude_changed_types;
mod exclude_hidden;
mod resolve_languages;

pub use add_default_values::AddDefaultValues;
pub use exclude_changed_types::ExcludeChangedTypes;
pub use exclude_hidden::ExcludeHidden;
pub use resolve_languages::ResolveLanguages;
