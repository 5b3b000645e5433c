//! Physical plan representation.
//!
//! The optimizer hands the compiler a tree of [`PlanNode`]s. Every node
//! carries the schema its executor must produce.

use std::fmt;

use quarry_common::types::TableId;
use quarry_core::expression::{AggregateExpr, ByItem, Expression};
use quarry_core::meta::ColumnMeta;
use quarry_core::schema::Schema;
use quarry_core::storage::HandleRange;
use serde::{Deserialize, Serialize};

/// A physical plan node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PlanNode {
    /// Join two inputs.
    Join(JoinPlan),
    /// Grouped aggregation.
    Aggregation(AggregationPlan),
    /// Filter rows by a condition list.
    Selection(SelectionPlan),
    /// Compute output expressions.
    Projection(ProjectionPlan),
    /// Scan a table.
    TableScan(TableScanPlan),
    /// Sort rows.
    Sort(SortPlan),
    /// Correlated subquery evaluation.
    Apply(ApplyPlan),
    /// EXISTS subquery.
    Exists(ExistsPlan),
    /// Scalar subquery guard.
    MaxOneRow(MaxOneRowPlan),
    /// LIMIT/OFFSET.
    Limit(LimitPlan),
    /// Scan an index.
    IndexScan(IndexScanPlan),
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// Inner join.
    Inner,
    /// Left outer join.
    LeftOuter,
    /// Right outer join.
    RightOuter,
    /// Semi join.
    Semi,
    /// Anti-semi join.
    AntiSemi,
    /// Full outer join.
    FullOuter,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inner => "inner",
            Self::LeftOuter => "left outer",
            Self::RightOuter => "right outer",
            Self::Semi => "semi",
            Self::AntiSemi => "anti semi",
            Self::FullOuter => "full outer",
        })
    }
}

/// Join operator.
///
/// Conditions are pre-classified by the optimizer: `equal_conditions` are
/// `left_col = right_col` pairs, `left_conditions`/`right_conditions` touch
/// one side only, and `other_conditions` touch both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPlan {
    /// Left input.
    pub left: Box<PlanNode>,
    /// Right input.
    pub right: Box<PlanNode>,
    /// Join type.
    pub join_type: JoinType,
    /// Equality conditions, left operand first.
    #[serde(default)]
    pub equal_conditions: Vec<Expression>,
    /// Conditions on the left input only.
    #[serde(default)]
    pub left_conditions: Vec<Expression>,
    /// Conditions on the right input only.
    #[serde(default)]
    pub right_conditions: Vec<Expression>,
    /// Conditions on both inputs.
    #[serde(default)]
    pub other_conditions: Vec<Expression>,
    /// Output schema.
    pub schema: Schema,
}

/// Aggregation operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// Aggregate functions.
    pub agg_funcs: Vec<AggregateExpr>,
    /// Group-by expressions.
    #[serde(default)]
    pub group_by: Vec<Expression>,
    /// Output schema.
    pub schema: Schema,
}

/// Selection operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// Conjunctive conditions.
    pub conditions: Vec<Expression>,
    /// Output schema.
    pub schema: Schema,
}

/// Projection operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// One expression per output column.
    pub exprs: Vec<Expression>,
    /// Output schema.
    pub schema: Schema,
}

/// Table scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableScanPlan {
    /// Table to scan.
    pub table_id: TableId,
    /// Database (schema) name the query addressed the table by.
    pub db_name: String,
    /// Alias the query gave the table.
    #[serde(default)]
    pub table_as_name: Option<String>,
    /// Columns to read.
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
    /// Handle ranges to read.
    #[serde(default)]
    pub ranges: Vec<HandleRange>,
    /// Output schema.
    pub schema: Schema,
}

/// Sort operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// Sort keys.
    pub by_items: Vec<ByItem>,
    /// Output schema.
    pub schema: Schema,
}

/// Apply operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyPlan {
    /// Outer input.
    pub input: Box<PlanNode>,
    /// Correlated inner plan.
    pub inner: Box<PlanNode>,
    /// Outer columns the inner plan references.
    pub outer_schema: Schema,
    /// Output schema.
    pub schema: Schema,
}

/// Exists operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// Output schema.
    pub schema: Schema,
}

/// MaxOneRow operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxOneRowPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// Output schema.
    pub schema: Schema,
}

/// Limit operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitPlan {
    /// Input.
    pub input: Box<PlanNode>,
    /// Rows to skip.
    #[serde(default)]
    pub offset: u64,
    /// Rows to return.
    pub count: u64,
    /// Output schema.
    pub schema: Schema,
}

/// Index scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexScanPlan {
    /// Table the index belongs to.
    pub table_id: TableId,
    /// Index name.
    pub index_name: String,
    /// Output schema.
    pub schema: Schema,
}

impl PlanNode {
    /// Returns the node kind name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "Join",
            Self::Aggregation(_) => "Aggregation",
            Self::Selection(_) => "Selection",
            Self::Projection(_) => "Projection",
            Self::TableScan(_) => "TableScan",
            Self::Sort(_) => "Sort",
            Self::Apply(_) => "Apply",
            Self::Exists(_) => "Exists",
            Self::MaxOneRow(_) => "MaxOneRow",
            Self::Limit(_) => "Limit",
            Self::IndexScan(_) => "IndexScan",
        }
    }

    /// Returns the output schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        match self {
            Self::Join(p) => &p.schema,
            Self::Aggregation(p) => &p.schema,
            Self::Selection(p) => &p.schema,
            Self::Projection(p) => &p.schema,
            Self::TableScan(p) => &p.schema,
            Self::Sort(p) => &p.schema,
            Self::Apply(p) => &p.schema,
            Self::Exists(p) => &p.schema,
            Self::MaxOneRow(p) => &p.schema,
            Self::Limit(p) => &p.schema,
            Self::IndexScan(p) => &p.schema,
        }
    }

    /// Returns the child plans, left to right.
    #[must_use]
    pub fn children(&self) -> Vec<&PlanNode> {
        match self {
            Self::Join(p) => vec![p.left.as_ref(), p.right.as_ref()],
            Self::Apply(p) => vec![p.input.as_ref(), p.inner.as_ref()],
            Self::Aggregation(p) => vec![p.input.as_ref()],
            Self::Selection(p) => vec![p.input.as_ref()],
            Self::Projection(p) => vec![p.input.as_ref()],
            Self::Sort(p) => vec![p.input.as_ref()],
            Self::Exists(p) => vec![p.input.as_ref()],
            Self::MaxOneRow(p) => vec![p.input.as_ref()],
            Self::Limit(p) => vec![p.input.as_ref()],
            Self::TableScan(_) | Self::IndexScan(_) => Vec::new(),
        }
    }

    /// Returns the height of the tree; a leaf has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(PlanNode::height)
            .max()
            .unwrap_or(0)
    }
}
