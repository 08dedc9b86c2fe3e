//! Collapsed view of the open-element stack.
//!
//! Repeated element names are folded onto the level of their shallowest
//! occurrence. The view is a fold over the stack from root to current and is
//! recomputed on each structural event; its size is bounded by the nesting
//! depth.

use crate::config::FlatteningOptions;
use crate::types::{Attributes, ElementFrame};
use crate::xml::render_attributes;

/// One level of the flattened view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFrame {
    pub name: String,
    pub attributes: Attributes,
    /// Number of deeper occurrences merged into this frame.
    pub nested_level: usize,
}

impl From<&ElementFrame> for FlatFrame {
    fn from(frame: &ElementFrame) -> Self {
        Self {
            name: frame.name.clone(),
            attributes: frame.attributes.clone(),
            nested_level: 0,
        }
    }
}

impl FlatFrame {
    /// Render the attribute segment of this frame's tag.
    ///
    /// The nested-level counter is appended under `level_attribute` once at
    /// least one occurrence has been merged, replacing any source attribute
    /// of that name.
    pub fn render_attributes(&self, level_attribute: &str) -> String {
        let level = self.nested_level.to_string();
        let mut pairs: Vec<(&str, &str)> = self
            .attributes
            .iter()
            .filter(|(name, _)| self.nested_level == 0 || *name != level_attribute)
            .collect();
        if self.nested_level > 0 {
            pairs.push((level_attribute, level.as_str()));
        }
        render_attributes(pairs)
    }
}

/// Compute the flat view of `frames`.
///
/// With flattening disabled every frame keeps its own level.
pub fn flatten(frames: &[ElementFrame], options: &FlatteningOptions) -> Vec<FlatFrame> {
    let mut flat: Vec<FlatFrame> = Vec::with_capacity(frames.len());
    for frame in frames {
        if options.enabled {
            if let Some(base) = flat.iter_mut().find(|f| f.name == frame.name) {
                merge_attributes(base, &frame.attributes, options);
                continue;
            }
        }
        flat.push(FlatFrame::from(frame));
    }
    flat
}

/// Merge the attributes of a deeper occurrence into `base`.
///
/// Absent keys and keys under an override rule are overwritten; everything
/// else is concatenated with the configured separator. The nested-level
/// counter is incremented whether or not any attribute changed.
pub fn merge_attributes(base: &mut FlatFrame, incoming: &Attributes, options: &FlatteningOptions) {
    for (key, value) in incoming.iter() {
        let overwrite = !base.attributes.contains(key) || options.overwrites(&base.name, key);
        if overwrite {
            base.attributes.set(key, value);
        } else if let Some(existing) = base.attributes.get_mut(key) {
            existing.push_str(options.separator_for(&base.name, key));
            existing.push_str(value);
        }
    }
    base.nested_level += 1;
}

/// Position of `name` in the flat view.
pub fn position_of(flat: &[FlatFrame], name: &str) -> Option<usize> {
    flat.iter().position(|frame| frame.name == name)
}
