//! Hash join executor.

use smallvec::SmallVec;

use super::{Executor, join_display};
use crate::expression::{ColumnRef, Expression};
use crate::schema::Schema;

/// Join key columns of one side. Most joins have very few keys.
pub type HashKey = SmallVec<[ColumnRef; 4]>;

/// A hash join.
///
/// The small side is drained into a hash table keyed on `small_hash_key`;
/// the big side then looks rows up in it by `big_hash_key`. `small_hash_key[i]`
/// pairs with `big_hash_key[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HashJoinExec {
    /// Build side.
    pub small_exec: Box<Executor>,
    /// Streamed side.
    pub big_exec: Box<Executor>,
    /// Whether unmatched big-side rows are kept, padded with NULLs.
    pub outer: bool,
    /// Whether the build side is the plan's left input.
    pub left_small: bool,
    /// Build-side key columns.
    pub small_hash_key: HashKey,
    /// Streamed-side key columns.
    pub big_hash_key: HashKey,
    /// Filter on build-side rows before hashing.
    pub small_filter: Option<Expression>,
    /// Filter on streamed-side rows before lookup.
    pub big_filter: Option<Expression>,
    /// Filter on joined rows.
    pub other_filter: Option<Expression>,
    /// Output schema.
    pub schema: Schema,
}

impl HashJoinExec {
    pub(super) fn detail(&self) -> String {
        let kind = match (self.outer, self.left_small) {
            (false, _) => "inner",
            (true, false) => "left outer",
            (true, true) => "right outer",
        };
        let mut out = format!(
            "{kind}, build:{}, keys:[{}]=[{}]",
            if self.left_small { "left" } else { "right" },
            join_display(&self.small_hash_key),
            join_display(&self.big_hash_key),
        );
        for (label, filter) in [
            ("small filter", &self.small_filter),
            ("big filter", &self.big_filter),
            ("other filter", &self.other_filter),
        ] {
            if let Some(filter) = filter {
                out.push_str(&format!(", {label}:{filter}"));
            }
        }
        out
    }
}
