//! Key/value properties attached to symbols and footprints.

use serde::{Deserialize, Serialize};

use crate::{geometry::At, style::TextEffects};

/// A named text field, the `(property "Key" "Value" ...)` form.
///
/// Properties carry their own placement and effects because KiCad renders
/// them as free-standing text (reference designators, values, sheet
/// metadata and so on).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    pub at: At,
    pub effects: TextEffects,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

/// Finds a property by key within a property list.
///
/// Later duplicates do not override earlier ones; the first match wins,
/// matching KiCad's own lookup behavior.
pub fn find_property<'a>(properties: &'a [Property], key: &str) -> Option<&'a Property> {
    properties.iter().find(|p| p.key == key)
}
