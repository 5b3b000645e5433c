//! Expression-to-wire compilation.
//!
//! A condition converts only if the storage client accepts every node type
//! the converted tree would contain, and every column it references belongs
//! to the scanned table. Columns of other tables (including outer references
//! of a correlated subquery over the same table) keep the condition local.

use bytes::Bytes;
use quarry_common::types::Value;
use quarry_common::utils::error::Result;
use tracing::trace;

use super::{ExprType, MAX_WIRE_DEPTH, WireExpr, codec};
use crate::expression::{ColumnRef, Expression, FuncKind};
use crate::meta::{ColumnMeta, TableInfo};
use crate::storage::{RequestSubType, RequestType, StorageClient};

/// Deepest single condition the compiler will convert; the rest of the wire
/// depth budget is left for the AND tree that joins pushed conditions.
const MAX_CONDITION_DEPTH: usize = MAX_WIRE_DEPTH / 2;

/// The scan a condition list is converted for.
#[derive(Debug, Clone, Copy)]
pub struct ScanTarget<'a> {
    /// Scanned table.
    pub table: &'a TableInfo,
    /// Alias the query gave the table, if any.
    pub alias: Option<&'a str>,
}

impl<'a> ScanTarget<'a> {
    /// Targets `table` under its own name.
    #[must_use]
    pub fn new(table: &'a TableInfo) -> Self {
        Self { table, alias: None }
    }

    /// Sets the alias the scan is known by.
    #[must_use]
    pub fn with_alias(mut self, alias: Option<&'a str>) -> Self {
        self.alias = alias;
        self
    }

    /// Returns the scanned column `col` refers to.
    ///
    /// A qualified reference must name the alias, or the table itself when
    /// the scan has none. Unqualified references resolve by name.
    #[must_use]
    pub fn resolve(&self, col: &ColumnRef) -> Option<&'a ColumnMeta> {
        if let Some(qualifier) = &col.qualifier {
            let owned = match self.alias {
                Some(alias) => qualifier.eq_ignore_ascii_case(alias),
                None => {
                    qualifier.eq_ignore_ascii_case(&self.table.name)
                        || qualifier.eq_ignore_ascii_case(&self.table.qualified_name())
                }
            };
            if !owned {
                return None;
            }
        }
        self.table.column(&col.name)
    }
}

/// Result of converting a condition list.
///
/// `converted[i]` is the wire form of the i-th input condition, or `None`
/// if it cannot be pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireConversion {
    /// One entry per input condition.
    pub converted: Vec<Option<WireExpr>>,
}

impl WireConversion {
    /// Returns how many conditions converted.
    #[must_use]
    pub fn pushable_count(&self) -> usize {
        self.converted.iter().filter(|c| c.is_some()).count()
    }
}

/// Converts conditions into wire expressions.
pub trait WireCompiler: Send + Sync {
    /// Converts each condition independently, consulting `client` for support.
    fn compile(
        &self,
        conditions: &[Expression],
        client: &dyn StorageClient,
        target: ScanTarget<'_>,
    ) -> Result<WireConversion>;
}

/// The default [`WireCompiler`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprToWire;

impl ExprToWire {
    /// Creates the compiler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn convert(
        &self,
        expr: &Expression,
        client: &dyn StorageClient,
        target: ScanTarget<'_>,
        depth: usize,
    ) -> Option<WireExpr> {
        if depth >= MAX_CONDITION_DEPTH {
            return None;
        }
        match expr {
            Expression::Column(col) => {
                let meta = target.resolve(col)?;
                supported(client, ExprType::ColumnRef)
                    .then(|| WireExpr::leaf(ExprType::ColumnRef, codec::encode_int(meta.id.as_i64())))
            }
            Expression::Constant(value) => {
                let (tp, val) = encode_value(value);
                supported(client, tp).then(|| WireExpr::leaf(tp, val))
            }
            Expression::ScalarFunction(func) => {
                let tp = func_expr_type(func.func)?;
                if !supported(client, tp) {
                    return None;
                }
                let children = func
                    .args
                    .iter()
                    .map(|arg| self.convert(arg, client, target, depth + 1))
                    .collect::<Option<Vec<_>>>()?;
                Some(WireExpr::node(tp, children))
            }
        }
    }
}

impl WireCompiler for ExprToWire {
    fn compile(
        &self,
        conditions: &[Expression],
        client: &dyn StorageClient,
        target: ScanTarget<'_>,
    ) -> Result<WireConversion> {
        let converted = conditions
            .iter()
            .map(|cond| {
                let wire = self.convert(cond, client, target, 0);
                if wire.is_none() {
                    trace!(%cond, "condition not convertible");
                }
                wire
            })
            .collect();
        Ok(WireConversion { converted })
    }
}

fn supported(client: &dyn StorageClient, tp: ExprType) -> bool {
    client.supports_request_type(RequestType::Select, RequestSubType::Expr(tp))
}

fn func_expr_type(func: FuncKind) -> Option<ExprType> {
    match func {
        FuncKind::And => Some(ExprType::And),
        FuncKind::Or => Some(ExprType::Or),
        FuncKind::Not => Some(ExprType::Not),
        FuncKind::Eq => Some(ExprType::Eq),
        FuncKind::Ne => Some(ExprType::Ne),
        FuncKind::Lt => Some(ExprType::Lt),
        FuncKind::Le => Some(ExprType::Le),
        FuncKind::Gt => Some(ExprType::Gt),
        FuncKind::Ge => Some(ExprType::Ge),
        FuncKind::Plus => Some(ExprType::Plus),
        FuncKind::Minus => Some(ExprType::Minus),
        FuncKind::Mul => Some(ExprType::Mul),
        FuncKind::Div => Some(ExprType::Div),
        FuncKind::Like => Some(ExprType::Like),
        FuncKind::In => Some(ExprType::In),
        FuncKind::IsNull => Some(ExprType::IsNull),
        FuncKind::Concat | FuncKind::Coalesce | FuncKind::Rand => None,
    }
}

fn encode_value(value: &Value) -> (ExprType, Bytes) {
    match value {
        Value::Null => (ExprType::Null, Bytes::new()),
        Value::Bool(b) => (ExprType::Int64, codec::encode_int(i64::from(*b))),
        Value::Int64(i) => (ExprType::Int64, codec::encode_int(*i)),
        Value::UInt64(u) => (ExprType::UInt64, codec::encode_uint(*u)),
        Value::Float64(v) => (ExprType::Float64, codec::encode_float(*v)),
        Value::String(s) => (ExprType::String, Bytes::copy_from_slice(s.as_bytes())),
        Value::Bytes(b) => (ExprType::Bytes, Bytes::copy_from_slice(b)),
    }
}
