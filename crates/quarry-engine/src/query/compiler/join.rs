//! Hash join strategy selection.
//!
//! Without statistics the build (small) side is fixed by join type: outer
//! joins build from the side whose unmatched rows are dropped, inner joins
//! build from the right input.

use quarry_common::utils::error::{Error, Result};
use quarry_core::execution::{Executor, HashJoinExec, HashKey};
use quarry_core::expression::{Expression, FuncKind};
use tracing::{debug, warn};

use super::{PlanCompiler, compose_condition};
use crate::query::plan::{JoinPlan, JoinType};

/// Build side and outer-ness of a hash join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinStrategy {
    /// Whether unmatched big-side rows are kept.
    pub outer: bool,
    /// Whether the left input is the build side.
    pub left_small: bool,
}

impl JoinStrategy {
    /// Returns the strategy for a join type.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJoinType` for semi, anti-semi and full outer joins.
    pub fn for_join(join_type: JoinType) -> Result<Self> {
        match join_type {
            JoinType::LeftOuter => Ok(Self {
                outer: true,
                left_small: false,
            }),
            JoinType::RightOuter => Ok(Self {
                outer: true,
                left_small: true,
            }),
            JoinType::Inner => Ok(Self {
                outer: false,
                left_small: false,
            }),
            JoinType::Semi | JoinType::AntiSemi | JoinType::FullOuter => {
                Err(Error::UnknownJoinType(join_type.to_string()))
            }
        }
    }
}

/// Splits `left = right` equality conditions into parallel key lists.
///
/// # Errors
///
/// Returns `Error::MalformedPlan` if a condition is not a two-argument
/// equality, or if either operand is not a plain column.
pub fn split_equal_conditions(conditions: &[Expression]) -> Result<(HashKey, HashKey)> {
    let mut left_keys = HashKey::new();
    let mut right_keys = HashKey::new();
    for cond in conditions {
        let (left, right) = match cond.as_function() {
            Some(f) if f.func == FuncKind::Eq && f.args.len() == 2 => (&f.args[0], &f.args[1]),
            _ => {
                return Err(Error::MalformedPlan(format!(
                    "join equality condition is not a binary equality: {cond}"
                )));
            }
        };
        let (Some(left), Some(right)) = (left.as_column(), right.as_column()) else {
            return Err(Error::MalformedPlan(format!(
                "join equality operand is not a column: {cond}"
            )));
        };
        left_keys.push(left.clone());
        right_keys.push(right.clone());
    }
    Ok((left_keys, right_keys))
}

impl PlanCompiler {
    pub(super) fn build_join(&self, plan: &JoinPlan, depth: usize) -> Result<Executor> {
        let strategy = JoinStrategy::for_join(plan.join_type).inspect_err(|err| {
            warn!(%err, "join rejected");
        })?;
        let (left_keys, right_keys) = split_equal_conditions(&plan.equal_conditions)?;

        let left = self.build(&plan.left, depth + 1)?;
        let right = self.build(&plan.right, depth + 1)?;

        let left_filter = compose_condition(&plan.left_conditions);
        let right_filter = compose_condition(&plan.right_conditions);

        let exec = if strategy.left_small {
            HashJoinExec {
                small_exec: Box::new(left),
                big_exec: Box::new(right),
                outer: strategy.outer,
                left_small: true,
                small_hash_key: left_keys,
                big_hash_key: right_keys,
                small_filter: left_filter,
                big_filter: right_filter,
                other_filter: compose_condition(&plan.other_conditions),
                schema: plan.schema.clone(),
            }
        } else {
            HashJoinExec {
                small_exec: Box::new(right),
                big_exec: Box::new(left),
                outer: strategy.outer,
                left_small: false,
                small_hash_key: right_keys,
                big_hash_key: left_keys,
                small_filter: right_filter,
                big_filter: left_filter,
                other_filter: compose_condition(&plan.other_conditions),
                schema: plan.schema.clone(),
            }
        };

        debug!(
            join_type = %plan.join_type,
            keys = exec.small_hash_key.len(),
            left_small = exec.left_small,
            "hash join planned"
        );
        Ok(Executor::HashJoin(exec))
    }
}
