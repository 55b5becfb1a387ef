//! Property tests for the reassembly engine.
//!
//! The core law under test: reassembly output is independent of
//! fragmentation boundaries. A test-side fragmenter re-chunks the same
//! logical value sequence into arbitrary message splits and the emitted rows
//! must match those of the unfragmented stream.

use std::{collections::VecDeque, mem};

use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any, prop_oneof},
    prop_assert,
    prop_assert_eq,
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestCaseError, TestRng, TestRunner},
};
use rstest::rstest;

use super::Reassembler;
use crate::{
    message::PartialMessage,
    row::Row,
    schema::{Column, ColumnType, RowSchema},
    value::Value,
};

fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}

fn schema(width: usize) -> RowSchema {
    let columns: Vec<Column> = (0..width)
        .map(|i| Column::new(format!("c{i}"), ColumnType::String))
        .collect();
    RowSchema::new(columns)
}

/// Cell strategy: ASCII strings keep every byte index a valid split point.
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(|n| Value::Number(f64::from(n))),
        "[a-z]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Value::List),
            vec(inner, 0..3).prop_map(Value::Struct),
        ]
    })
}

fn row_values_strategy(width: usize, rows: usize) -> impl Strategy<Value = Vec<Vec<Value>>> {
    vec(vec(value_strategy(), width), 0..rows)
}

/// Minimal deterministic generator for fragmentation decisions.
struct SplitRng(u64);

impl SplitRng {
    fn new(seed: u64) -> Self { Self(seed | 1) }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        usize::try_from(self.next()).unwrap_or(usize::MAX) % bound.max(1)
    }

    fn chance(&mut self, one_in: usize) -> bool { self.below(one_in) == 0 }
}

/// Split one mergeable value into two halves that the merge rule reunites.
///
/// Returns `None` for atomic values. When a list is split at an element
/// boundary whose neighbours are the same mergeable kind, an empty value of
/// that kind is inserted so the unconditional boundary merge reproduces the
/// original elements.
fn split_value(value: Value, rng: &mut SplitRng) -> Option<(Value, Value)> {
    match value {
        Value::String(s) => {
            let mut at = rng.below(s.len() + 1);
            while !s.is_char_boundary(at) {
                at -= 1;
            }
            let (left, right) = s.split_at(at);
            Some((Value::String(left.to_owned()), Value::String(right.to_owned())))
        }
        Value::List(mut elements) => {
            let nested_candidates: Vec<usize> = elements
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_mergeable())
                .map(|(i, _)| i)
                .collect();

            // Prefer splitting inside a nested element now and then.
            if !nested_candidates.is_empty() && rng.chance(2) {
                let idx = nested_candidates[rng.below(nested_candidates.len())];
                let (inner_left, inner_right) =
                    split_value(elements[idx].clone(), rng).expect("candidate is mergeable");
                let tail: Vec<Value> = elements.split_off(idx + 1);
                elements[idx] = inner_left;
                let mut right = vec![inner_right];
                right.extend(tail);
                return Some((Value::List(elements), Value::List(right)));
            }

            let at = rng.below(elements.len() + 1);
            let mut right = elements.split_off(at);
            if let (Some(last), Some(first)) = (elements.last(), right.first()) {
                if last.is_mergeable() && last.kind() == first.kind() {
                    let filler = match last {
                        Value::String(_) => Value::String(String::new()),
                        _ => Value::List(Vec::new()),
                    };
                    right.insert(0, filler);
                }
            }
            Some((Value::List(elements), Value::List(right)))
        }
        _ => None,
    }
}

/// Re-chunk a flattened value sequence into partial messages.
fn fragment(flat: Vec<Value>, width: usize, rng: &mut SplitRng) -> Vec<PartialMessage> {
    let mut queue: VecDeque<Value> = flat.into();
    let mut messages = Vec::new();
    let mut current: Vec<Value> = Vec::new();

    while let Some(value) = queue.pop_front() {
        if value.is_mergeable() && rng.chance(3) {
            if let Some((left, right)) = split_value(value.clone(), rng) {
                current.push(left);
                messages.push(PartialMessage::new(mem::take(&mut current), true));
                queue.push_front(right);
                continue;
            }
        }
        current.push(value);
        if rng.chance(3) {
            messages.push(PartialMessage::new(mem::take(&mut current), false));
        }
    }
    if !current.is_empty() || messages.is_empty() {
        messages.push(PartialMessage::new(current, false));
    }

    messages[0].schema = Some(schema(width));
    messages
}

fn emitted_rows(
    messages: Vec<PartialMessage>,
) -> Result<(Vec<Vec<Value>>, Reassembler), TestCaseError> {
    let mut reassembler = Reassembler::new();
    let mut rows = Vec::new();
    for message in messages {
        let emitted = reassembler
            .process(message)
            .map_err(|err| TestCaseError::fail(format!("reassembly failed: {err}")))?;
        rows.extend(emitted.into_iter().map(Row::into_values));
    }
    Ok((rows, reassembler))
}

#[rstest]
#[case(1, 96)]
#[case(2, 96)]
#[case(3, 64)]
fn rechunking_preserves_emitted_rows(#[case] width: usize, #[case] cases: u32) {
    let mut runner = deterministic_runner(cases);
    let strategy = (row_values_strategy(width, 8), any::<u64>());

    runner
        .run(&strategy, |(expected, seed)| {
            let flat: Vec<Value> = expected.iter().flatten().cloned().collect();
            let messages = fragment(flat, width, &mut SplitRng::new(seed));

            let (rows, reassembler) = emitted_rows(messages)?;
            prop_assert_eq!(&rows, &expected);
            prop_assert!(reassembler.is_drained());

            for row in &rows {
                prop_assert_eq!(row.len(), width);
            }
            Ok(())
        })
        .expect("re-chunked streams should reassemble identically");
}

#[rstest]
#[case(2, 64)]
fn flattened_row_values_preserve_input_order(#[case] width: usize, #[case] cases: u32) {
    let mut runner = deterministic_runner(cases);
    let strategy = (row_values_strategy(width, 8), any::<u64>());

    runner
        .run(&strategy, |(expected, seed)| {
            let flat: Vec<Value> = expected.iter().flatten().cloned().collect();
            let messages = fragment(flat.clone(), width, &mut SplitRng::new(seed));

            let (rows, _) = emitted_rows(messages)?;
            let emitted_flat: Vec<Value> = rows.into_iter().flatten().collect();
            prop_assert_eq!(emitted_flat, flat);
            Ok(())
        })
        .expect("emission order should match arrival order");
}

#[test]
fn multi_hop_split_matches_two_way_split() {
    let width = 1;
    let value = Value::from("reassemble");

    let three_way = vec![
        PartialMessage::new(vec![Value::from("reas")], true).with_schema(schema(width)),
        PartialMessage::new(vec![Value::from("semb")], true),
        PartialMessage::new(vec![Value::from("le")], false),
    ];
    let two_way = vec![
        PartialMessage::new(vec![Value::from("reassem")], true).with_schema(schema(width)),
        PartialMessage::new(vec![Value::from("ble")], false),
    ];

    let (three_way_rows, _) = emitted_rows(three_way).expect("three-way split");
    let (two_way_rows, _) = emitted_rows(two_way).expect("two-way split");
    assert_eq!(three_way_rows, two_way_rows);
    assert_eq!(three_way_rows, vec![vec![value]]);
}

#[test]
fn multi_hop_list_split_reassembles() {
    let rows = vec![
        PartialMessage::new(vec![Value::List(vec![Value::from("a")])], true)
            .with_schema(schema(1)),
        PartialMessage::new(vec![Value::List(vec![Value::from("b"), Value::from("c")])], true),
        PartialMessage::new(vec![Value::List(vec![Value::from("d")])], false),
    ];

    let (emitted, _) = emitted_rows(rows).expect("multi-hop list split");
    assert_eq!(
        emitted,
        vec![vec![Value::List(vec![
            Value::from("ab"),
            Value::from("cd"),
        ])]]
    );
}
