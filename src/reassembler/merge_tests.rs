//! Unit tests for chunk-split value concatenation.

use rstest::rstest;

use super::{error::ReassemblyError, merge::merge_chunked};
use crate::value::{Value, ValueKind};

fn list(values: Vec<Value>) -> Value { Value::List(values) }

#[test]
fn strings_concatenate() {
    let merged = merge_chunked(Value::from("he"), Value::from("llo")).expect("strings merge");
    assert_eq!(merged, Value::from("hello"));
}

#[test]
fn lists_append_elementwise() {
    let merged = merge_chunked(
        list(vec![Value::Number(1.0), Value::Number(2.0)]),
        list(vec![Value::Number(3.0)]),
    )
    .expect("lists merge");
    assert_eq!(
        merged,
        list(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0)
        ])
    );
}

#[test]
fn nested_string_boundary_merges() {
    // The split fell inside "cd": List["ab", "c"] + List["d", "ef"].
    let merged = merge_chunked(
        list(vec![Value::from("ab"), Value::from("c")]),
        list(vec![Value::from("d"), Value::from("ef")]),
    )
    .expect("nested split merges");
    assert_eq!(
        merged,
        list(vec![Value::from("ab"), Value::from("cd"), Value::from("ef")])
    );
}

#[test]
fn nested_list_boundary_merges() {
    // The split fell inside the inner list, and inside its trailing string.
    let merged = merge_chunked(
        list(vec![list(vec![Value::from("x"), Value::from("y")])]),
        list(vec![list(vec![Value::from("z")]), Value::Bool(true)]),
    )
    .expect("nested list split merges");
    assert_eq!(
        merged,
        list(vec![
            list(vec![Value::from("x"), Value::from("yz")]),
            Value::Bool(true),
        ])
    );
}

#[test]
fn atomic_boundary_elements_are_not_merged() {
    let merged = merge_chunked(
        list(vec![Value::Bool(true)]),
        list(vec![Value::Bool(false)]),
    )
    .expect("lists of atoms merge");
    assert_eq!(merged, list(vec![Value::Bool(true), Value::Bool(false)]));
}

#[test]
fn mixed_kind_boundary_elements_are_appended() {
    // String next to list at the boundary: not a nested split.
    let merged = merge_chunked(
        list(vec![Value::from("a")]),
        list(vec![list(vec![Value::from("b")])]),
    )
    .expect("mixed boundary appends");
    assert_eq!(
        merged,
        list(vec![Value::from("a"), list(vec![Value::from("b")])])
    );
}

#[test]
fn empty_incoming_list_leaves_carry_unchanged() {
    let merged = merge_chunked(list(vec![Value::from("a")]), list(vec![])).expect("merge");
    assert_eq!(merged, list(vec![Value::from("a")]));
}

#[test]
fn empty_carried_list_adopts_incoming_elements() {
    let merged =
        merge_chunked(list(vec![]), list(vec![Value::from("a"), Value::from("b")])).expect("merge");
    assert_eq!(merged, list(vec![Value::from("a"), Value::from("b")]));
}

#[rstest]
#[case::string_then_list(Value::from("a"), list(vec![]), ValueKind::String, ValueKind::List)]
#[case::list_then_string(list(vec![]), Value::from("a"), ValueKind::List, ValueKind::String)]
#[case::bool_carry(Value::Bool(true), Value::Bool(false), ValueKind::Bool, ValueKind::Bool)]
#[case::number_continuation(Value::from("a"), Value::Number(1.0), ValueKind::String, ValueKind::Number)]
fn mismatched_variants_are_rejected(
    #[case] carried: Value,
    #[case] incoming: Value,
    #[case] expected_carried: ValueKind,
    #[case] expected_incoming: ValueKind,
) {
    assert_eq!(
        merge_chunked(carried, incoming),
        Err(ReassemblyError::ChunkMergeMismatch {
            carried: expected_carried,
            incoming: expected_incoming,
        })
    );
}
