//! Highlighted / other split of extracted metadata
//!
//! Generation tools store their settings under a handful of well-known
//! keywords. [`MetadataView`] pulls those out, in a fixed order, and leaves
//! everything else in map order.

use crate::metadata::{MetadataMap, MetadataValue};
use std::fmt;

/// Keywords shown first, in this order
pub const HIGHLIGHTED_KEYS: &[&str] = &[
    "parameters",
    "Negative prompt",
    "Steps",
    "Sampler",
    "CFG scale",
    "Seed",
    "Size",
    "Model hash",
    "Lora",
    "Model",
];

/// Check whether a keyword belongs to the highlighted set
pub fn is_highlighted(key: &str) -> bool {
    HIGHLIGHTED_KEYS.contains(&key)
}

/// Display form of a value
///
/// A single value containing `{` that parses as JSON (ComfyUI `prompt` and
/// `workflow` payloads) is pretty-printed with two-space indentation.
/// Everything else is returned as displayed by [`MetadataValue`].
pub fn format_value(value: &MetadataValue) -> String {
    if let Some(text) = value.as_single() {
        if text.contains('{') {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
                if let Ok(pretty) = serde_json::to_string_pretty(&json) {
                    return pretty;
                }
            }
        }
    }
    value.to_string()
}

/// Metadata partitioned for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataView<'a> {
    /// Present highlighted keywords, in [`HIGHLIGHTED_KEYS`] order
    pub highlighted: Vec<(&'a str, &'a MetadataValue)>,
    /// Remaining keywords, in map order
    pub other: Vec<(&'a str, &'a MetadataValue)>,
}

impl<'a> MetadataView<'a> {
    /// Partition a metadata map
    ///
    /// Every present keyword lands in exactly one half, empty values
    /// included.
    pub fn split(metadata: &'a MetadataMap) -> Self {
        let highlighted = HIGHLIGHTED_KEYS
            .iter()
            .filter_map(|&key| metadata.get(key).map(|value| (key, value)))
            .collect();
        let other = metadata.iter().filter(|(key, _)| !is_highlighted(key)).collect();

        Self { highlighted, other }
    }

    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.highlighted.is_empty() && self.other.is_empty()
    }

    /// Plain text of the highlighted parameters, one `key: value` line each
    pub fn copy_text(&self) -> String {
        self.highlighted
            .iter()
            .map(|(key, value)| format!("{}: {}\n", key, value))
            .collect()
    }
}

impl fmt::Display for MetadataView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key AI Generation Parameters:")?;
        for (key, value) in &self.highlighted {
            writeln!(f, "  {}: {}", key, value)?;
        }
        writeln!(f, "---")?;
        writeln!(f, "Other Metadata:")?;
        for (key, value) in &self.other {
            writeln!(f, "  {}: {}", key, format_value(value))?;
        }
        Ok(())
    }
}
