//! Concatenation of chunk-split values.

use super::error::ReassemblyError;
use crate::value::Value;

/// Merge a carried incomplete value with its continuation from the next
/// message.
///
/// Strings concatenate. Lists append element-wise, except that when the
/// carried list's last element and the incoming list's first element are both
/// mergeable and of the same variant, the split fell inside that nested
/// element and the pair is merged by this same rule before the remainder is
/// appended.
///
/// # Errors
///
/// Returns [`ReassemblyError::ChunkMergeMismatch`] when the two values are
/// not the same mergeable variant, including when a carry exists for a
/// non-mergeable variant.
pub(crate) fn merge_chunked(carried: Value, incoming: Value) -> Result<Value, ReassemblyError> {
    match (carried, incoming) {
        (Value::String(mut head), Value::String(tail)) => {
            head.push_str(&tail);
            Ok(Value::String(head))
        }
        (Value::List(mut head), Value::List(tail)) => {
            let mut tail = tail.into_iter();
            if let Some(first) = tail.next() {
                match head.pop() {
                    Some(last) if boundary_is_split(&last, &first) => {
                        head.push(merge_chunked(last, first)?);
                    }
                    Some(last) => {
                        head.push(last);
                        head.push(first);
                    }
                    None => head.push(first),
                }
            }
            head.extend(tail);
            Ok(Value::List(head))
        }
        (carried, incoming) => Err(ReassemblyError::ChunkMergeMismatch {
            carried: carried.kind(),
            incoming: incoming.kind(),
        }),
    }
}

/// Whether a list boundary pair is itself a nested split that must merge.
fn boundary_is_split(last: &Value, first: &Value) -> bool {
    last.is_mergeable() && last.kind() == first.kind()
}
