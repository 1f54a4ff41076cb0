mod common;

use common::strategies::*;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use formstore_core::execution::InlineScheduler;
use formstore_core::registry::FormRegistry;
use formstore_core::ui::{new_dispatch_token, ButtonSpec, Element, FormBuilder};
use formstore_core::{ComponentKind, DispatchKey, Form};

fn form_from_groups(groups: &[Option<u8>]) -> Arc<Form> {
    groups
        .iter()
        .enumerate()
        .fold(FormBuilder::new().no_timeout(), |builder, (i, group)| {
            let element = Element::button(ButtonSpec::new("b").custom_id(format!("e{i}"))).unwrap();
            element.set_group(*group).unwrap();
            builder.passive(element)
        })
        .build()
        .unwrap()
}

proptest! {
    /// Property: rows never exceed five elements and never mix groups
    #[test]
    fn layout_rows_are_bounded_and_homogeneous(groups in form_groups_strategy()) {
        let form = form_from_groups(&groups);
        let layout = form.to_layout();

        let total: usize = layout.iter().map(|row| row.len()).sum();
        prop_assert_eq!(total, groups.len());
        for row in &layout {
            prop_assert!(!row.is_empty() && row.len() <= 5);
        }

        // Grouped rows come first in ascending order, ungrouped rows last.
        let order: Vec<(bool, u8)> = layout
            .iter()
            .map(|row| (row.group.is_none(), row.group.unwrap_or(u8::MAX)))
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        prop_assert_eq!(order, sorted);
    }

    /// Property: insertion order is preserved within each group
    #[test]
    fn layout_is_stable_within_groups(groups in form_groups_strategy()) {
        let form = form_from_groups(&groups);
        for row in form.to_layout() {
            let indices: Vec<usize> = row
                .components
                .iter()
                .filter_map(|c| c.custom_id())
                .map(|id| id[1..].parse().unwrap())
                .collect();
            prop_assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    /// Property: registered keys are unique and failed adds change nothing
    #[test]
    fn registry_keys_stay_unique(batches in id_batches_strategy()) {
        let registry = FormRegistry::new(Arc::new(InlineScheduler::new()));
        let mut held: HashSet<String> = HashSet::new();

        for batch in batches {
            let form = batch
                .iter()
                .fold(FormBuilder::new().no_timeout(), |builder, id| {
                    builder.passive(Element::button(ButtonSpec::new("b").custom_id(id.as_str())).unwrap())
                })
                .build()
                .unwrap();

            let distinct: HashSet<&String> = batch.iter().collect();
            let conflicts = distinct.len() != batch.len()
                || batch.iter().any(|id| held.contains(id));
            let before = registry.stats();

            match registry.add_form(&form, None) {
                Ok(()) => {
                    prop_assert!(!conflicts);
                    held.extend(batch.iter().cloned());
                }
                Err(_) => {
                    prop_assert!(conflicts);
                    prop_assert_eq!(registry.stats(), before);
                }
            }
        }

        prop_assert_eq!(registry.stats().total_entries, held.len());
        for id in &held {
            prop_assert!(registry.contains_key(&DispatchKey::new(ComponentKind::Button, id.as_str())));
        }
    }
}

#[test]
fn test_generated_tokens_are_valid_custom_ids() {
    for _ in 0..100 {
        let token = new_dispatch_token();
        let element = Element::button(ButtonSpec::new("t").custom_id(token.clone())).unwrap();
        assert_eq!(element.custom_id(), Some(token));
    }
}
