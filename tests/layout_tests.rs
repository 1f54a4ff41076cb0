mod common;

use common::*;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use formstore_core::ui::{ButtonSpec, Element, FormBuilder, SelectSpec};

fn custom_ids(form: &formstore_core::Form) -> Vec<Vec<String>> {
    form.to_layout()
        .iter()
        .map(|row| {
            row.components
                .iter()
                .filter_map(|c| c.custom_id().map(str::to_string))
                .collect()
        })
        .collect()
}

#[test]
fn test_twelve_ungrouped_elements_chunk_into_five_five_two() {
    let counter = Arc::new(AtomicUsize::new(0));
    let ids: Vec<String> = (0..12).map(|i| format!("b{i:02}")).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let form = button_form(&id_refs, None, &counter);

    let rows = custom_ids(&form);
    let sizes: Vec<usize> = rows.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![5, 5, 2]);
    assert_eq!(rows.concat(), ids);
}

#[test]
fn test_grouped_row_precedes_ungrouped() {
    let form = FormBuilder::new()
        .passive(plain_button("loose-a"))
        .passive(Element::button(ButtonSpec::new("g1").custom_id("g1").group(1)).unwrap())
        .passive(plain_button("loose-b"))
        .passive(Element::button(ButtonSpec::new("g2").custom_id("g2").group(1)).unwrap())
        .passive(Element::button(ButtonSpec::new("g3").custom_id("g3").group(1)).unwrap())
        .build()
        .unwrap();

    let layout = form.to_layout();
    assert_eq!(layout.len(), 2);
    assert_eq!(layout[0].group, Some(1));
    assert_eq!(custom_ids(&form), vec![
        vec!["g1".to_string(), "g2".to_string(), "g3".to_string()],
        vec!["loose-a".to_string(), "loose-b".to_string()],
    ]);
}

#[test]
fn test_to_components_emits_action_rows() {
    let form = FormBuilder::new()
        .passive(Element::select(SelectSpec::new().custom_id("menu").group(0)).unwrap())
        .passive(plain_button("ok"))
        .build()
        .unwrap();

    let components = form.to_components();
    assert_eq!(components.len(), 2);
    assert!(components.iter().all(|row| row["type"] == 1));
    assert_eq!(components[0]["components"][0]["type"], 3);
    assert_eq!(components[1]["components"][0]["custom_id"], "ok");
}

#[test]
fn test_group_change_moves_element_between_rows() {
    let form = FormBuilder::new()
        .passive(plain_button("a"))
        .passive(plain_button("b"))
        .build()
        .unwrap();
    form.element_by_custom_id("b")
        .unwrap()
        .set_group(Some(0))
        .unwrap();

    assert_eq!(custom_ids(&form), vec![
        vec!["b".to_string()],
        vec!["a".to_string()],
    ]);
}
