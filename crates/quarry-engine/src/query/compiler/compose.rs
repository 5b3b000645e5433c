//! Condition list composition.

use quarry_core::expression::{Expression, compose_balanced};

/// Combines a conjunctive condition list into one balanced AND tree.
///
/// Returns `None` for an empty list (no filtering) and the single condition
/// unchanged for a one-element list. Otherwise the list is split at
/// `len / 2` and both halves are composed recursively, so `n` conditions
/// yield an AND spine of depth `ceil(log2(n))` with the conditions in their
/// original left-to-right order. For an odd-length list the extra condition
/// goes to the right half.
pub fn compose_condition(conditions: &[Expression]) -> Option<Expression> {
    compose_balanced(conditions, &mut Expression::and)
}
