//! # Layout
//!
//! Groups a form's elements into rendered rows. Elements are ordered by group
//! index with ungrouped elements last, the sort is stable so insertion order
//! survives within a group, and each group is chunked into rows of at most
//! [`MAX_ROW_WIDTH`] elements.

use serde_json::{json, Value};
use std::sync::Arc;

use super::element::Element;
use crate::components::{ComponentDescriptor, ComponentKind};
use crate::constants::MAX_ROW_WIDTH;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub group: Option<u8>,
    pub components: Vec<ComponentDescriptor>,
}

impl LayoutRow {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Wire payload of the row as an action row.
    pub fn to_value(&self) -> Value {
        json!({
            "type": ComponentKind::ActionRow.value(),
            "components": self.components.iter().map(ComponentDescriptor::to_value).collect::<Vec<_>>(),
        })
    }
}

fn sort_key(group: Option<u8>) -> (bool, u8) {
    (group.is_none(), group.unwrap_or(u8::MAX))
}

pub fn build_layout(elements: &[Arc<Element>]) -> Vec<LayoutRow> {
    let mut ordered: Vec<(Option<u8>, ComponentDescriptor)> = elements
        .iter()
        .map(|element| (element.group(), element.to_descriptor()))
        .collect();
    ordered.sort_by_key(|(group, _)| sort_key(*group));

    let mut rows = Vec::new();
    let mut start = 0;
    while start < ordered.len() {
        let group = ordered[start].0;
        let end = ordered[start..]
            .iter()
            .position(|(g, _)| *g != group)
            .map_or(ordered.len(), |offset| start + offset);

        for chunk in ordered[start..end].chunks(MAX_ROW_WIDTH) {
            rows.push(LayoutRow {
                group,
                components: chunk.iter().map(|(_, d)| d.clone()).collect(),
            });
        }
        start = end;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::element::ButtonSpec;

    fn button(id: &str, group: Option<u8>) -> Arc<Element> {
        let element = Element::button(ButtonSpec::new(id).custom_id(id)).unwrap();
        element.set_group(group).unwrap();
        Arc::new(element)
    }

    fn ids(row: &LayoutRow) -> Vec<&str> {
        row.components
            .iter()
            .filter_map(ComponentDescriptor::custom_id)
            .collect()
    }

    #[test]
    fn test_empty_form_has_no_rows() {
        assert!(build_layout(&[]).is_empty());
    }

    #[test]
    fn test_groups_sort_before_ungrouped_and_keep_order() {
        let elements = vec![
            button("loose-1", None),
            button("two-a", Some(2)),
            button("zero", Some(0)),
            button("loose-2", None),
            button("two-b", Some(2)),
        ];
        let rows = build_layout(&elements);

        assert_eq!(rows.len(), 3);
        assert_eq!(ids(&rows[0]), vec!["zero"]);
        assert_eq!(ids(&rows[1]), vec!["two-a", "two-b"]);
        assert_eq!(rows[2].group, None);
        assert_eq!(ids(&rows[2]), vec!["loose-1", "loose-2"]);
    }

    #[test]
    fn test_row_payload_is_action_row() {
        let rows = build_layout(&[button("a", None)]);
        let value = rows[0].to_value();
        assert_eq!(value["type"], 1);
        assert_eq!(value["components"][0]["custom_id"], "a");
    }
}
