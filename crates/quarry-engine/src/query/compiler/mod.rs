//! Physical plan compiler.
//!
//! Walks a [`PlanNode`] tree top-down and builds the matching [`Executor`]
//! tree bottom-up. Along the way it:
//!
//! - picks the hash join build side ([`join`])
//! - negotiates predicate push-down into table scans ([`pushdown`])
//! - composes condition lists into balanced AND trees ([`compose`])
//!
//! The first error aborts compilation; no partial tree is returned.

mod compose;
mod join;
mod pushdown;

pub use compose::compose_condition;
pub use join::{JoinStrategy, split_equal_conditions};
pub use pushdown::{Pushdown, PushdownTranslator};

use std::sync::Arc;

use quarry_common::utils::error::{Error, Result};
use quarry_core::execution::{
    AggregationExec, ApplyExec, ExistsExec, Executor, MaxOneRowExec, ProjectionExec,
    SelectionExec, SortExec, TableScanExec,
};
use quarry_core::storage::{RequestSubType, RequestType};
use quarry_core::wire::{ExprToWire, WireCompiler};
use tracing::{debug, trace, warn};

use crate::context::CompileContext;
use crate::query::plan::{
    AggregationPlan, ApplyPlan, ExistsPlan, MaxOneRowPlan, PlanNode, ProjectionPlan,
    SelectionPlan, SortPlan, TableScanPlan,
};

/// Schemas served from memory rather than storage; scanning them is not supported here.
const RESERVED_SCHEMAS: [&str; 3] = ["information_schema", "performance_schema", "metrics_schema"];

/// Returns whether `db_name` names an in-memory system schema.
#[must_use]
pub fn is_reserved_schema(db_name: &str) -> bool {
    RESERVED_SCHEMAS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(db_name))
}

/// Compiles physical plans into executor trees.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use quarry_common::types::{LogicalType, TableId};
/// use quarry_core::meta::TableInfo;
/// use quarry_core::schema::{ColumnInfo, Schema};
/// use quarry_core::storage::{MemoryClient, MemoryTransaction};
/// use quarry_engine::query::plan::TableScanPlan;
/// use quarry_engine::{CompileContext, MemoryCatalog, PlanCompiler, PlanNode};
///
/// let catalog = MemoryCatalog::new();
/// let table = catalog.register(
///     TableInfo::new(TableId::new(1), "test", "t").with_column("a", LogicalType::Int64),
/// );
/// let txn = MemoryTransaction::new(1, Arc::new(MemoryClient::full()));
/// let ctx = CompileContext::new(Arc::new(catalog)).with_transaction(Arc::new(txn));
///
/// let plan = PlanNode::TableScan(TableScanPlan {
///     table_id: table.id,
///     db_name: "test".into(),
///     table_as_name: None,
///     columns: table.columns.clone(),
///     ranges: Vec::new(),
///     schema: Schema::new(vec![ColumnInfo::new("a", LogicalType::Int64)]),
/// });
///
/// let exec = PlanCompiler::new(ctx).compile(&plan).unwrap();
/// assert_eq!(exec.name(), "TableScan");
/// ```
pub struct PlanCompiler {
    ctx: CompileContext,
    wire: Arc<dyn WireCompiler>,
}

impl PlanCompiler {
    /// Creates a compiler using the default wire compiler.
    #[must_use]
    pub fn new(ctx: CompileContext) -> Self {
        Self {
            ctx,
            wire: Arc::new(ExprToWire::new()),
        }
    }

    /// Replaces the wire compiler used for push-down.
    #[must_use]
    pub fn with_wire_compiler(mut self, wire: Arc<dyn WireCompiler>) -> Self {
        self.wire = wire;
        self
    }

    /// Returns the compile context.
    #[must_use]
    pub fn context(&self) -> &CompileContext {
        &self.ctx
    }

    /// Compiles a plan tree.
    ///
    /// # Errors
    ///
    /// Returns the first error met anywhere in the tree.
    pub fn compile(&self, plan: &PlanNode) -> Result<Executor> {
        self.build(plan, 1)
    }

    /// Builds one node at `depth` (the root is at depth 1).
    fn build(&self, node: &PlanNode, depth: usize) -> Result<Executor> {
        let limit = self.ctx.config().max_plan_depth;
        if depth > limit {
            warn!(depth, limit, "plan too deep");
            return Err(Error::PlanTooDeep { depth, limit });
        }

        let exec = match node {
            PlanNode::Join(plan) => self.build_join(plan, depth)?,
            PlanNode::Aggregation(plan) => self.build_aggregation(plan, depth)?,
            PlanNode::Selection(plan) => self.build_selection(plan, depth)?,
            PlanNode::Projection(plan) => self.build_projection(plan, depth)?,
            PlanNode::TableScan(plan) => self.build_table_scan(plan)?,
            PlanNode::Sort(plan) => self.build_sort(plan, depth)?,
            PlanNode::Apply(plan) => self.build_apply(plan, depth)?,
            PlanNode::Exists(plan) => self.build_exists(plan, depth)?,
            PlanNode::MaxOneRow(plan) => self.build_max_one_row(plan, depth)?,
            PlanNode::Limit(_) | PlanNode::IndexScan(_) => {
                warn!(node = node.name(), "plan node rejected");
                return Err(Error::UnsupportedPlan(node.name().to_string()));
            }
        };

        debug_assert_eq!(
            exec.schema(),
            node.schema(),
            "{} compiled to {} with a different schema",
            node.name(),
            exec.name()
        );
        debug!(node = node.name(), executor = exec.name(), depth, "compiled");
        Ok(exec)
    }

    fn build_selection(&self, plan: &SelectionPlan, depth: usize) -> Result<Executor> {
        let mut child = self.build(&plan.input, depth + 1)?;
        let mut conditions = plan.conditions.clone();

        if self.ctx.config().enable_pushdown
            && !conditions.is_empty()
            && let Some(slot) = child.pushdown_slot()
        {
            let translator = PushdownTranslator::new(&self.ctx, self.wire.as_ref());
            let Pushdown { pushed, remaining } =
                translator.translate(&conditions, slot.target, slot.existing())?;
            if let Some(pushed) = pushed {
                slot.replace(pushed);
            }
            conditions = remaining;
        }

        match compose_condition(&conditions) {
            None => {
                trace!(child = child.name(), "selection elided");
                Ok(child)
            }
            Some(condition) => Ok(Executor::Selection(SelectionExec::new(
                child,
                condition,
                plan.schema.clone(),
            ))),
        }
    }

    fn build_projection(&self, plan: &ProjectionPlan, depth: usize) -> Result<Executor> {
        let child = self.build(&plan.input, depth + 1)?;
        Ok(Executor::Projection(ProjectionExec::new(
            child,
            plan.exprs.clone(),
            plan.schema.clone(),
        )))
    }

    fn build_aggregation(&self, plan: &AggregationPlan, depth: usize) -> Result<Executor> {
        let child = self.build(&plan.input, depth + 1)?;
        Ok(Executor::Aggregation(AggregationExec {
            child: Box::new(child),
            agg_funcs: plan.agg_funcs.clone(),
            group_by: plan.group_by.clone(),
            schema: plan.schema.clone(),
        }))
    }

    fn build_sort(&self, plan: &SortPlan, depth: usize) -> Result<Executor> {
        let child = self.build(&plan.input, depth + 1)?;
        Ok(Executor::Sort(SortExec {
            child: Box::new(child),
            by_items: plan.by_items.clone(),
            schema: plan.schema.clone(),
        }))
    }

    fn build_table_scan(&self, plan: &TableScanPlan) -> Result<Executor> {
        let txn = self.ctx.txn()?;
        let table = self
            .ctx
            .catalog()
            .table_by_id(plan.table_id)
            .ok_or(Error::TableNotFound(plan.table_id))?;

        if is_reserved_schema(&plan.db_name) {
            warn!(db = %plan.db_name, "scan of in-memory schema rejected");
            return Err(Error::NotImplemented(format!(
                "table scan over {}",
                plan.db_name
            )));
        }

        let client = txn.client();
        if !client.supports_request_type(RequestType::Select, RequestSubType::Basic) {
            return Err(Error::NotImplemented(
                "storage client does not support select requests".to_string(),
            ));
        }
        let desc_supported =
            client.supports_request_type(RequestType::Select, RequestSubType::Desc);

        Ok(Executor::TableScan(TableScanExec {
            table,
            as_name: plan.table_as_name.clone(),
            columns: plan.columns.clone(),
            ranges: plan.ranges.clone(),
            desc_supported,
            pushed_filter: None,
            start_ts: txn.start_ts(),
            schema: plan.schema.clone(),
        }))
    }

    fn build_apply(&self, plan: &ApplyPlan, depth: usize) -> Result<Executor> {
        let child = self.build(&plan.input, depth + 1)?;
        let inner = self.build(&plan.inner, depth + 1)?;
        Ok(Executor::Apply(ApplyExec {
            child: Box::new(child),
            inner: Box::new(inner),
            outer_schema: plan.outer_schema.clone(),
            schema: plan.schema.clone(),
        }))
    }

    fn build_exists(&self, plan: &ExistsPlan, depth: usize) -> Result<Executor> {
        let child = self.build(&plan.input, depth + 1)?;
        Ok(Executor::Exists(ExistsExec {
            child: Box::new(child),
            schema: plan.schema.clone(),
        }))
    }

    fn build_max_one_row(&self, plan: &MaxOneRowPlan, depth: usize) -> Result<Executor> {
        let child = self.build(&plan.input, depth + 1)?;
        Ok(Executor::MaxOneRow(MaxOneRowExec {
            child: Box::new(child),
            schema: plan.schema.clone(),
        }))
    }
}
