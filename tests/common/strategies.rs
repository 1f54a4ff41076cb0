use proptest::prelude::*;

/// Strategy for valid custom ids
pub fn custom_id_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}"
}

/// Strategy for an element's optional layout group
pub fn group_strategy() -> impl Strategy<Value = Option<u8>> {
    prop::option::of(0u8..=4)
}

/// Strategy for the groups of a form's elements, within the element cap
pub fn form_groups_strategy() -> impl Strategy<Value = Vec<Option<u8>>> {
    prop::collection::vec(group_strategy(), 0..=25)
}

/// Strategy for batches of custom ids, possibly overlapping between batches
pub fn id_batches_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec("[a-e]", 1..=4),
        1..=6,
    )
}
